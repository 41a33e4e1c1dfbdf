//! Quill CLI - compile saved query states to SQL
//!
//! Usage:
//!   quill compile <schema.json> <state.json>
//!   quill validate <schema.json> <state.json>
//!   quill suggest <schema.json> <from-table> <to-table>
//!
//! Examples:
//!   quill compile fixtures/shop_schema.json saved_query.json
//!   quill suggest fixtures/shop_schema.json public.orders public.customers

use clap::{Parser, Subcommand};
use quill::sql;
use quill::{infer_join, QueryState, Schema, TableId};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - query compilation engine for an interactive SQL composer")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a saved query state to SQL
    Compile {
        /// Path to the schema model JSON
        schema: PathBuf,

        /// Path to the query state JSON
        state: PathBuf,
    },

    /// Check a saved query state without printing SQL
    Validate {
        /// Path to the schema model JSON
        schema: PathBuf,

        /// Path to the query state JSON
        state: PathBuf,
    },

    /// Suggest a join between two tables
    Suggest {
        /// Path to the schema model JSON
        schema: PathBuf,

        /// Source table (`schema.table`)
        from: String,

        /// Target table (`schema.table`)
        to: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Compile { schema, state } => cmd_compile(schema, state),
        Commands::Validate { schema, state } => cmd_validate(schema, state),
        Commands::Suggest { schema, from, to } => cmd_suggest(schema, from, to),
    }
}

fn cmd_compile(schema_path: PathBuf, state_path: PathBuf) -> ExitCode {
    let Some(schema) = load_schema(&schema_path) else {
        return ExitCode::FAILURE;
    };
    let Some(state) = load_state(&state_path) else {
        return ExitCode::FAILURE;
    };

    match sql::compile(&schema, &state) {
        Ok(output) => {
            for warning in &output.warnings {
                eprintln!("warning: {}", warning);
            }
            println!("{}", output.sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(schema_path: PathBuf, state_path: PathBuf) -> ExitCode {
    let Some(schema) = load_schema(&schema_path) else {
        return ExitCode::FAILURE;
    };
    let Some(state) = load_state(&state_path) else {
        return ExitCode::FAILURE;
    };

    match sql::compile(&schema, &state) {
        Ok(output) => {
            for warning in &output.warnings {
                eprintln!("warning: {}", warning);
            }
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid query state: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_suggest(schema_path: PathBuf, from: String, to: String) -> ExitCode {
    let Some(schema) = load_schema(&schema_path) else {
        return ExitCode::FAILURE;
    };

    let from = TableId::parse(&from);
    let to = TableId::parse(&to);

    // No match is a normal outcome, not a failure.
    match infer_join(&schema, &from, &to) {
        Some(p) => {
            println!(
                "{} JOIN {} ON {}.{} = {}.{}",
                p.kind.keyword(),
                p.to_table,
                p.from_table,
                p.from_column,
                p.to_table,
                p.to_column
            );
            ExitCode::SUCCESS
        }
        None => {
            println!("no relationship found between {} and {}", from, to);
            ExitCode::SUCCESS
        }
    }
}

fn load_schema(path: &Path) -> Option<Schema> {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            return None;
        }
    };

    let schema: Schema = match serde_json::from_str(&source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing schema '{}': {}", path.display(), e);
            return None;
        }
    };

    if let Err(e) = schema.validate() {
        eprintln!("Invalid schema '{}': {}", path.display(), e);
        return None;
    }

    Some(schema)
}

fn load_state(path: &Path) -> Option<QueryState> {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&source) {
        Ok(state) => Some(state),
        Err(e) => {
            eprintln!("Error parsing query state '{}': {}", path.display(), e);
            None
        }
    }
}
