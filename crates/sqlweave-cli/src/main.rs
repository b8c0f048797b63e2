//! sqlweave CLI
//!
//! Renders SQL for a chosen dialect from loosely written expressions and
//! prints the statement with its bound arguments.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use sqlweave_core::{
    builtin_dialects, infer_literal, resolve_dialect, Condition, CustomDialect, Delete, Dialect,
    ParamBinder, Select, SqlValue, Validatable,
};

/// Dialect-aware SQL rendering.
#[derive(Parser, Debug)]
#[command(name = "sqlweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialect name (generic, postgres, mysql, sqlite, mssql).
    #[arg(short, long, env = "SQLWEAVE_DIALECT", default_value = "generic")]
    dialect: String,

    /// JSON file describing a custom dialect; overrides --dialect.
    #[arg(long, env = "SQLWEAVE_DIALECT_CONFIG")]
    dialect_config: Option<PathBuf>,

    /// Print `{"sql": ..., "args": [...]}` instead of plain text.
    #[arg(long)]
    json: bool,

    /// Print arguments as escaped SQL literals instead of JSON.
    #[arg(long, conflicts_with = "json")]
    inline: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a SELECT statement.
    Select(SelectArgs),

    /// Render a DELETE statement.
    Delete(DeleteArgs),

    /// Resolve a single condition and render it.
    Condition {
        /// Expression such as "status = 'active'" or "id IN ?".
        expr: String,

        /// Values to bind; literals are inferred ("42", "true", "'text'").
        values: Vec<String>,
    },

    /// List the built-in dialects and their capabilities.
    Dialects,
}

#[derive(Args, Debug)]
struct SelectArgs {
    /// Table to select from, e.g. "users u".
    #[arg(long)]
    from: String,

    /// Column to select; repeatable. Defaults to `*`.
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// Select distinct rows.
    #[arg(long)]
    distinct: bool,

    /// Inline condition joined with AND, e.g. "age >= 18"; repeatable.
    #[arg(short = 'w', long = "where")]
    filters: Vec<String>,

    /// Inline condition joined with OR; repeatable.
    #[arg(long = "or-where")]
    or_filters: Vec<String>,

    /// Column to group by; repeatable.
    #[arg(long)]
    group_by: Vec<String>,

    /// Column to order by; repeatable.
    #[arg(long)]
    order_by: Vec<String>,

    /// Sort descending.
    #[arg(long)]
    desc: bool,

    /// Maximum number of rows (0 for none).
    #[arg(long, default_value_t = 0)]
    limit: u64,

    /// Rows to skip (0 for none).
    #[arg(long, default_value_t = 0)]
    offset: u64,
}

impl SelectArgs {
    fn build(&self, dialect: &dyn Dialect) -> anyhow::Result<(String, Vec<SqlValue>)> {
        let mut select = Select::new().columns(&as_strs(&self.columns));
        if self.distinct {
            select = select.distinct();
        }
        let mut select = select.from(&self.from);
        for expr in &self.filters {
            select = select.and_where(expr, no_values());
        }
        for expr in &self.or_filters {
            select = select.or_where(expr, no_values());
        }
        select = select.group_by(&as_strs(&self.group_by));
        select = if self.desc {
            select.order_by_desc(&as_strs(&self.order_by))
        } else {
            select.order_by(&as_strs(&self.order_by))
        };
        select
            .limit(self.limit)
            .offset(self.offset)
            .build(dialect)
            .context("invalid SELECT")
    }
}

#[derive(Args, Debug)]
struct DeleteArgs {
    /// Table to delete from.
    #[arg(long)]
    from: String,

    /// Inline condition joined with AND; repeatable.
    #[arg(short = 'w', long = "where")]
    filters: Vec<String>,

    /// Inline condition joined with OR; repeatable.
    #[arg(long = "or-where")]
    or_filters: Vec<String>,

    /// Column to return; repeatable.
    #[arg(long)]
    returning: Vec<String>,
}

impl DeleteArgs {
    fn build(&self, dialect: &dyn Dialect) -> anyhow::Result<(String, Vec<SqlValue>)> {
        let mut delete = Delete::new().from(&self.from);
        for expr in &self.filters {
            delete = delete.and_where(expr, no_values());
        }
        for expr in &self.or_filters {
            delete = delete.or_where(expr, no_values());
        }
        delete
            .returning(&as_strs(&self.returning))
            .build(dialect)
            .context("invalid DELETE")
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
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let stdout = io::stdout();
    run(&cli, &mut stdout.lock())
}

fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let custom = cli.dialect_config.as_deref().map(load_dialect).transpose()?;
    let dialect: &dyn Dialect = custom
        .as_ref()
        .map_or_else(|| resolve_dialect(&cli.dialect), |custom| custom as &dyn Dialect);
    debug!(dialect = dialect.name(), "resolved dialect");

    match &cli.command {
        Commands::Select(args) => {
            let (sql, params) = args.build(dialect)?;
            print_statement(out, cli, &sql, &params)
        }

        Commands::Delete(args) => {
            let (sql, params) = args.build(dialect)?;
            print_statement(out, cli, &sql, &params)
        }

        Commands::Condition { expr, values } => {
            let cond = Condition::simple(expr, values.iter().map(|v| infer_literal(v)));
            if let Some(err) = cond.error() {
                anyhow::bail!("invalid condition {expr:?}: {err}");
            }
            let mut binder = ParamBinder::new(dialect);
            let sql = cond.render(&mut binder);
            binder.check()?;
            print_statement(out, cli, &sql, binder.args())
        }

        Commands::Dialects => {
            for dialect in builtin_dialects() {
                writeln!(out, "{}", serde_json::to_string(dialect.options())?)?;
            }
            Ok(())
        }
    }
}

fn load_dialect(path: &Path) -> anyhow::Result<CustomDialect> {
    let config =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    CustomDialect::from_json(&config).with_context(|| format!("loading {}", path.display()))
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

const fn no_values() -> [SqlValue; 0] {
    []
}

fn print_statement(
    out: &mut impl Write,
    cli: &Cli,
    sql: &str,
    args: &[SqlValue],
) -> anyhow::Result<()> {
    if cli.json {
        writeln!(out, "{}", json!({ "sql": sql, "args": args }))?;
        return Ok(());
    }
    writeln!(out, "{sql}")?;
    if args.is_empty() {
        return Ok(());
    }
    let rendered = if cli.inline {
        let literals: Vec<String> = args.iter().map(SqlValue::to_sql_inline).collect();
        literals.join(", ")
    } else {
        serde_json::to_string(args)?
    };
    writeln!(out, "-- args: {rendered}")?;
    Ok(())
}
