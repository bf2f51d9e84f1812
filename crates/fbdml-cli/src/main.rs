//! fbdml CLI
//!
//! Command-line tool for inspecting Firebird DML statements and for
//! previewing the statement executed when generated keys are requested.

use std::io::Read;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use fbdml_core::{Lexer, Token};
use fbdml_keys::{
    GeneratedKeysMode, GeneratedKeysSupport, KeysRequest, ServerVersion, StaticMetadata,
    normalize_object_name,
};

/// Inspect Firebird DML statements and rewrite them for generated keys.
#[derive(Parser)]
#[command(name = "fbdml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tokens of a statement.
    Tokens {
        /// Statement text, or `-` to read from stdin.
        sql: String,

        /// Include whitespace and comments.
        #[arg(long)]
        all: bool,
    },

    /// Show the table, columns, values and RETURNING columns of a statement.
    Parse {
        /// Statement text, or `-` to read from stdin.
        sql: String,

        /// Print the model and diagnostics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the statement executed when generated keys are requested.
    Rewrite(RewriteArgs),
}

#[derive(Args)]
struct RewriteArgs {
    /// Statement text, or `-` to read from stdin.
    sql: String,

    /// Return the named columns (used as given, quote them if needed).
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["indexes", "all_columns"])]
    columns: Vec<String>,

    /// Return the columns at these 1-based positions.
    #[arg(long, value_delimiter = ',', conflicts_with = "all_columns")]
    indexes: Vec<usize>,

    /// Return all columns of the table.
    #[arg(long)]
    all_columns: bool,

    /// Columns of the statement's table in ordinal order.
    #[arg(long, value_delimiter = ',')]
    table_columns: Vec<String>,

    /// Firebird server version.
    #[arg(long, env = "FBDML_SERVER_VERSION", default_value = "4.0")]
    server_version: ServerVersion,

    /// SQL dialect of the connection.
    #[arg(long, env = "FBDML_DIALECT", default_value_t = 3,
          value_parser = clap::value_parser!(u8).range(1..=3))]
    dialect: u8,

    /// Generated keys mode: default, disabled, ignored or a list of query types.
    #[arg(long, env = "FBDML_GENERATED_KEYS", default_value = "default")]
    generated_keys: GeneratedKeysMode,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

impl RewriteArgs {
    fn request(&self) -> KeysRequest<'_> {
        if !self.columns.is_empty() {
            KeysRequest::ColumnNames(&self.columns)
        } else if !self.indexes.is_empty() {
            KeysRequest::ColumnIndexes(&self.indexes)
        } else if self.all_columns {
            KeysRequest::ReturnGeneratedKeys
        } else {
            KeysRequest::NoGeneratedKeys
        }
    }

    /// Metadata describing the statement's table with `--table-columns`.
    fn metadata(&self, sql: &str) -> StaticMetadata {
        let metadata = StaticMetadata::new(self.server_version, self.dialect);
        let table = fbdml_core::parse(sql)
            .ok()
            .and_then(|parsed| parsed.model.table_name().map(normalize_object_name));
        match table {
            Some(table) if !self.table_columns.is_empty() => {
                metadata.with_table(table, self.table_columns.iter().map(String::as_str))
            }
            _ => metadata,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Tokens { sql, all } => {
            let sql = read_sql(sql)?;
            let mut lexer = Lexer::new(&sql);
            let tokens = if all {
                lexer.tokenize_all()
            } else {
                lexer.tokenize()
            };
            for token in &tokens {
                println!("{}", format_token(token, &sql));
            }
            for diagnostic in lexer.diagnostics().entries() {
                info!("{diagnostic}");
            }
        }

        Commands::Parse { sql, json } => {
            let sql = read_sql(sql)?;
            let parsed = fbdml_core::parse(&sql)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                let model = &parsed.model;
                let statement_type = model
                    .statement_type()
                    .map_or("unidentified", |t| t.as_str());
                println!("type:      {statement_type}");
                println!("table:     {}", model.table_name().unwrap_or("-"));
                println!("columns:   {}", model.columns().join(", "));
                println!("values:    {}", model.values().join(", "));
                println!("returning: {}", model.returning_columns().join(", "));
                if model.has_default_values() {
                    println!("default values");
                }
                for message in parsed.messages() {
                    info!("{message}");
                }
            }
        }

        Commands::Rewrite(args) => {
            let sql = read_sql(args.sql.clone())?;
            let support =
                GeneratedKeysSupport::configure(&args.generated_keys, args.server_version);
            debug!(?support, "Configured generated keys support");

            let metadata = args.metadata(&sql);
            let query = support.build_query(&sql, args.request(), &metadata)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&query)?);
            } else {
                if !query.generates_keys {
                    info!("Statement does not produce generated keys");
                }
                println!("{}", query.sql);
            }
        }
    }

    Ok(())
}

/// Returns `sql`, or the contents of stdin if it is `-`.
fn read_sql(sql: String) -> anyhow::Result<String> {
    if sql != "-" {
        return Ok(sql);
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read statement from stdin")?;
    Ok(buffer)
}

fn format_token(token: &Token, sql: &str) -> String {
    let kind = format!("{:?}", token.kind);
    format!(
        "{:>4}..{:<4} {kind:<20} {}",
        token.span.start,
        token.span.end,
        token.text(sql).escape_debug()
    )
}
