#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use quill::error::CompileError;
    use quill::inference::infer_join;
    use quill::schema::{Column, ColumnTarget, Schema, Table};
    use quill::sql::compile;
    use quill::state::{AggregateFunc, FilterOperator, JoinKind, QueryState, SortDir};
    use quill::{ColumnId, TableId};

    fn shop_schema() -> Schema {
        Schema::new(vec![
            Table::new(
                TableId::parse("public.orders"),
                vec![
                    Column::new("id", "integer").primary_key(),
                    Column::new("customer_id", "integer")
                        .foreign_key(ColumnTarget::parse("public.customers.id").unwrap()),
                    Column::new("amount", "numeric"),
                    Column::new("status", "varchar"),
                ],
            ),
            Table::new(
                TableId::parse("public.customers"),
                vec![
                    Column::new("id", "integer").primary_key(),
                    Column::new("name", "varchar"),
                    Column::new("region", "varchar"),
                ],
            ),
            Table::new(
                TableId::parse("public.products"),
                vec![
                    Column::new("id", "integer").primary_key(),
                    Column::new("title", "varchar"),
                ],
            ),
            Table::new(
                TableId::parse("public.payments"),
                vec![
                    Column::new("amount", "numeric"),
                    Column::new("method", "varchar"),
                ],
            ),
        ])
        .unwrap()
    }

    fn orders() -> TableId {
        TableId::parse("public.orders")
    }

    fn col(s: &str) -> ColumnId {
        ColumnId::parse(s).unwrap()
    }

    #[test]
    fn test_single_table_baseline() {
        let state = QueryState::new().toggle_table(&orders());
        let output = compile(&shop_schema(), &state).unwrap();

        assert_snapshot!(output.sql, @"SELECT public.orders.* FROM public.orders LIMIT 100");
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_explicit_columns() {
        let state = QueryState::new()
            .toggle_column(&col("public.orders.id"))
            .toggle_column(&col("public.orders.amount"));
        let output = compile(&shop_schema(), &state).unwrap();

        assert_eq!(
            output.sql,
            "SELECT public.orders.id, public.orders.amount FROM public.orders LIMIT 100"
        );
    }

    #[test]
    fn test_explicit_join() {
        let state = QueryState::new().toggle_table(&orders()).add_join(
            col("public.orders.customer_id"),
            JoinKind::Left,
            col("public.customers.id"),
        );
        let output = compile(&shop_schema(), &state).unwrap();

        assert_snapshot!(
            output.sql,
            @"SELECT public.orders.*, public.customers.* FROM public.orders LEFT JOIN public.customers ON public.orders.customer_id = public.customers.id LIMIT 100"
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_accepted_proposal_compiles_like_a_manual_join() {
        let schema = shop_schema();
        let proposal = infer_join(&schema, &orders(), &TableId::parse("public.customers")).unwrap();

        let accepted = QueryState::new()
            .toggle_table(&orders())
            .accept_proposal(&proposal);
        let manual = QueryState::new().toggle_table(&orders()).add_join(
            col("public.orders.customer_id"),
            JoinKind::Left,
            col("public.customers.id"),
        );

        assert_eq!(
            compile(&schema, &accepted).unwrap().sql,
            compile(&schema, &manual).unwrap().sql
        );
    }

    #[test]
    fn test_unjoined_table_becomes_cross_join_with_warning() {
        let state = QueryState::new()
            .toggle_table(&orders())
            .toggle_table(&TableId::parse("public.products"));
        let output = compile(&shop_schema(), &state).unwrap();

        assert_eq!(
            output.sql,
            "SELECT public.orders.*, public.products.* FROM public.orders, public.products LIMIT 100"
        );
        assert_eq!(
            output.warnings,
            vec![CompileError::UnjoinedTable {
                table: TableId::parse("public.products")
            }]
        );
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let state = QueryState::new()
            .toggle_column(&col("public.orders.id"))
            .add_filter(col("public.orders.status"), FilterOperator::Eq, "shipped")
            .add_filter(col("public.orders.amount"), FilterOperator::Gte, "100");
        let output = compile(&shop_schema(), &state).unwrap();

        assert_eq!(
            output.sql,
            "SELECT public.orders.id FROM public.orders \
             WHERE public.orders.status = 'shipped' AND public.orders.amount >= 100 LIMIT 100"
        );
    }

    #[test]
    fn test_in_list_named_parameter_and_unary_operator() {
        let state = QueryState::new()
            .toggle_column(&col("public.orders.id"))
            .add_filter(col("public.orders.status"), FilterOperator::In, "new, shipped")
            .add_filter(col("public.orders.amount"), FilterOperator::Gt, ":min_amount")
            .add_filter(col("public.orders.status"), FilterOperator::IsNotNull, "");
        let output = compile(&shop_schema(), &state).unwrap();

        assert_eq!(
            output.sql,
            "SELECT public.orders.id FROM public.orders \
             WHERE public.orders.status IN ('new', 'shipped') \
             AND public.orders.amount > :min_amount \
             AND public.orders.status IS NOT NULL LIMIT 100"
        );
    }

    #[test]
    fn test_string_values_are_escaped() {
        let state = QueryState::new()
            .toggle_column(&col("public.customers.name"))
            .add_filter(col("public.customers.name"), FilterOperator::Eq, "O'Brien");
        let output = compile(&shop_schema(), &state).unwrap();

        assert!(output.sql.contains("= 'O''Brien'"));
    }

    #[test]
    fn test_aggregation_with_grouping() {
        let state = QueryState::new()
            .toggle_column(&col("public.orders.status"))
            .toggle_group_by(&col("public.orders.status"))
            .set_aggregation(&col("public.orders.amount"), Some(AggregateFunc::Sum));
        let output = compile(&shop_schema(), &state).unwrap();

        assert_snapshot!(
            output.sql,
            @"SELECT public.orders.status, SUM(public.orders.amount) AS amount_sum FROM public.orders GROUP BY public.orders.status LIMIT 100"
        );
    }

    #[test]
    fn test_count_alias_is_derived_from_column_and_function() {
        let state = QueryState::new()
            .set_aggregation(&col("public.customers.id"), Some(AggregateFunc::Count))
            .toggle_column(&col("public.customers.region"))
            .toggle_group_by(&col("public.customers.region"));
        let output = compile(&shop_schema(), &state).unwrap();

        assert!(output.sql.contains("COUNT(public.customers.id) AS id_count"));
    }

    #[test]
    fn test_ungrouped_explicit_column_is_an_error() {
        let state = QueryState::new()
            .toggle_column(&col("public.orders.id"))
            .toggle_group_by(&col("public.orders.status"));
        let err = compile(&shop_schema(), &state).unwrap_err();

        assert_eq!(
            err,
            CompileError::UngroupedColumn {
                column: col("public.orders.id")
            }
        );
        // the message names the offending column
        assert!(err.to_string().contains("public.orders.id"));
    }

    #[test]
    fn test_implicit_whole_row_selection_joins_the_grouping_rule() {
        // aggregation set, nothing explicitly selected: the whole-row
        // baseline implicitly selects payments.method, which is not grouped
        let state: QueryState = serde_json::from_str(
            r#"{
                "selected_tables": ["public.payments"],
                "aggregations": { "public.payments.amount": "SUM" }
            }"#,
        )
        .unwrap();

        let err = compile(&shop_schema(), &state).unwrap_err();
        assert_eq!(
            err,
            CompileError::UngroupedColumn {
                column: col("public.payments.method")
            }
        );

        // grouping the implicit column resolves it
        let grouped = state.toggle_group_by(&col("public.payments.method"));
        let output = compile(&shop_schema(), &grouped).unwrap();
        assert_eq!(
            output.sql,
            "SELECT SUM(public.payments.amount) AS amount_sum, public.payments.method \
             FROM public.payments GROUP BY public.payments.method LIMIT 100"
        );
    }

    #[test]
    fn test_dangling_column_reference_is_structural() {
        let state: QueryState = serde_json::from_str(
            r#"{
                "selected_tables": ["public.customers"],
                "selected_columns": ["public.orders.id"]
            }"#,
        )
        .unwrap();

        let err = compile(&shop_schema(), &state).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnselectedColumnTable {
                column: col("public.orders.id")
            }
        );
    }

    #[test]
    fn test_dangling_join_reference_is_structural() {
        let state: QueryState = serde_json::from_str(
            r#"{
                "selected_tables": ["public.orders"],
                "joins": [{
                    "id": "00000000-0000-0000-0000-000000000001",
                    "from_table": "public.orders",
                    "from_column": "customer_id",
                    "kind": "LEFT",
                    "to_table": "public.customers",
                    "to_column": "id"
                }]
            }"#,
        )
        .unwrap();

        let err = compile(&shop_schema(), &state).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnselectedJoinTable {
                table: TableId::parse("public.customers")
            }
        );
    }

    #[test]
    fn test_selected_table_missing_from_schema() {
        let state = QueryState::new().toggle_table(&TableId::parse("public.nope"));
        let err = compile(&shop_schema(), &state).unwrap_err();

        assert_eq!(
            err,
            CompileError::UnknownTable {
                table: TableId::parse("public.nope")
            }
        );
    }

    #[test]
    fn test_empty_selection_regardless_of_other_fields() {
        let state = QueryState::new().set_limit(50);
        assert_eq!(
            compile(&shop_schema(), &state).unwrap_err(),
            CompileError::EmptySelection
        );
    }

    #[test]
    fn test_order_by_preserves_list_order() {
        let state = QueryState::new()
            .toggle_column(&col("public.orders.amount"))
            .add_sort(col("public.orders.amount"), SortDir::Desc)
            .add_sort(col("public.orders.id"), SortDir::Asc);
        let output = compile(&shop_schema(), &state).unwrap();

        assert_eq!(
            output.sql,
            "SELECT public.orders.amount FROM public.orders \
             ORDER BY public.orders.amount DESC, public.orders.id ASC LIMIT 100"
        );
    }

    #[test]
    fn test_calculated_column_suppresses_the_wildcard() {
        let state = QueryState::new()
            .toggle_table(&orders())
            .add_calculated_column("Net Total", "public.orders.amount - 5")
            .unwrap();
        let output = compile(&shop_schema(), &state).unwrap();

        assert_eq!(
            output.sql,
            "SELECT (public.orders.amount - 5) AS net_total FROM public.orders LIMIT 100"
        );
    }

    #[test]
    fn test_calculated_column_follows_selected_columns() {
        let state = QueryState::new()
            .toggle_column(&col("public.orders.id"))
            .add_calculated_column("net_total", "public.orders.amount - 5")
            .unwrap();
        let output = compile(&shop_schema(), &state).unwrap();

        assert_eq!(
            output.sql,
            "SELECT public.orders.id, (public.orders.amount - 5) AS net_total \
             FROM public.orders LIMIT 100"
        );
    }

    #[test]
    fn test_non_positive_limit_fails_on_the_generate_path() {
        let state = QueryState::new().toggle_table(&orders()).set_limit(0);
        assert_eq!(
            compile(&shop_schema(), &state).unwrap_err(),
            CompileError::NonPositiveLimit { limit: 0 }
        );
    }

    #[test]
    fn test_custom_limit() {
        let state = QueryState::new().toggle_table(&orders()).set_limit(10);
        let output = compile(&shop_schema(), &state).unwrap();
        assert!(output.sql.ends_with("LIMIT 10"));
    }
}
