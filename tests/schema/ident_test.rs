#[cfg(test)]
mod tests {
    use quill::schema::{ColumnId, ColumnTarget, TableId};

    #[test]
    fn test_table_id_defaults_schema() {
        assert_eq!(TableId::parse("orders").to_string(), "public.orders");
        assert_eq!(TableId::parse("sales.orders").to_string(), "sales.orders");
    }

    #[test]
    fn test_column_id_canonical_rendering() {
        let column = ColumnId::parse("sales.orders.amount").unwrap();
        assert_eq!(column.table().to_string(), "sales.orders");
        assert_eq!(column.name(), "amount");
        assert_eq!(column.to_string(), "sales.orders.amount");

        // legacy two-part form picks up the default schema
        let column = ColumnId::parse("orders.amount").unwrap();
        assert_eq!(column.to_string(), "public.orders.amount");
    }

    #[test]
    fn test_column_id_rejects_bare_name() {
        assert!(ColumnId::parse("amount").is_err());
        assert!(ColumnId::parse("").is_err());
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let table = TableId::parse("sales.orders");
        assert_eq!(serde_json::to_string(&table).unwrap(), "\"sales.orders\"");

        let column = table.column("amount");
        let json = serde_json::to_string(&column).unwrap();
        assert_eq!(json, "\"sales.orders.amount\"");
        assert_eq!(serde_json::from_str::<ColumnId>(&json).unwrap(), column);
    }

    #[test]
    fn test_qualified_target_requires_exact_table() {
        let target = ColumnTarget::parse("sales.orders.id").unwrap();
        assert_eq!(target.column_for(&TableId::parse("sales.orders")), Some("id"));
        assert_eq!(target.column_for(&TableId::parse("public.orders")), None);
    }

    #[test]
    fn test_legacy_target_matches_any_schema() {
        let target = ColumnTarget::parse("orders.id").unwrap();
        assert_eq!(target.column_for(&TableId::parse("sales.orders")), Some("id"));
        assert_eq!(target.column_for(&TableId::parse("public.orders")), Some("id"));
        assert_eq!(target.column_for(&TableId::parse("public.customers")), None);
    }
}
