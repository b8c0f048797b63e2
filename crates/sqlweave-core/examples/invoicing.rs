//! Invoicing System - Dialect-Aware Query Example
//!
//! Builds the queries of a small multi-tenant invoicing system:
//! - Dashboard listings with date ranges and pagination
//! - Client search and per-client aggregates
//! - Invoice creation, status updates and cleanup
//!
//! Run with: cargo run --example invoicing -- postgres

use sqlweave_core::{resolve_dialect, Delete, Dialect, Insert, Select, SqlValue, Update};

fn print_sql(title: &str, (sql, args): &(String, Vec<SqlValue>)) {
    println!("-- {title}");
    println!("{sql};");
    if !args.is_empty() {
        let inline: Vec<String> = args.iter().map(SqlValue::to_sql_inline).collect();
        println!("-- args: {}", inline.join(", "));
    }
    println!();
}

fn dashboard(dialect: &dyn Dialect, company_id: i64) -> sqlweave_core::Result<()> {
    let january = Select::new()
        .columns(&["id", "invoice_number", "client_id", "status", "total_cents", "due_date"])
        .from("invoices")
        .where_("company_id", [company_id])
        .and_where("issue_date BETWEEN ? AND ?", ["2024-01-01", "2024-01-31"])
        .order_by(&["issue_date"])
        .build(dialect)?;
    print_sql("Invoices for January 2024", &january);

    let overdue = Select::new()
        .from("invoices")
        .where_("company_id", [company_id])
        .and_where("status = 'sent'", Vec::<SqlValue>::new())
        .and_where("due_date <", ["2024-01-15"])
        .order_by_desc(&["due_date"])
        .limit(20)
        .build(dialect)?;
    print_sql("Overdue invoices", &overdue);

    let by_status = Select::new()
        .columns(&["status", "COUNT(*) AS invoices", "SUM(total_cents) AS total"])
        .from("invoices")
        .where_("company_id", [company_id])
        .and_where("status NOT IN ?", ["void", "draft"])
        .group_by(&["status"])
        .having("SUM(total_cents) >", [0])
        .build(dialect)?;
    print_sql("Totals per status", &by_status);
    Ok(())
}

fn clients(dialect: &dyn Dialect, company_id: i64) -> sqlweave_core::Result<()> {
    let search = Select::new()
        .columns(&["c.id", "c.name", "c.email"])
        .from("clients c")
        .where_("c.company_id", [company_id])
        .and_where("c.name LIKE ?", ["%acme%"])
        .order_by(&["c.name"])
        .limit(10)
        .build(dialect)?;
    print_sql("Search clients by name", &search);

    let open_balance = Select::new()
        .with_cte(
            "open_invoices",
            Select::new()
                .columns(&["client_id", "total_cents"])
                .from("invoices")
                .where_("status IN ?", ["sent", "overdue"]),
        )
        .columns(&["c.name", "SUM(o.total_cents) AS open_cents"])
        .from("clients c")
        .inner_join("open_invoices o", "o.client_id", "c.id")
        .where_("c.company_id", [company_id])
        .group_by(&["c.name"])
        .build(dialect)?;
    print_sql("Open balance per client", &open_balance);
    Ok(())
}

fn lifecycle(dialect: &dyn Dialect, company_id: i64) -> sqlweave_core::Result<()> {
    let create = Insert::new()
        .into("invoices")
        .columns(&["company_id", "client_id", "invoice_number", "status", "total_cents"])
        .values([
            SqlValue::Int(company_id),
            SqlValue::Int(42),
            SqlValue::Text(String::from("INV-2024-001")),
            SqlValue::Text(String::from("draft")),
            SqlValue::Int(125_000),
        ]);
    if dialect.supports_upsert() {
        let upsert = create
            .on_conflict(&["invoice_number"])
            .do_update(&["status", "total_cents"])
            .build(dialect)?;
        print_sql("Create or refresh invoice", &upsert);
    } else {
        print_sql("Create invoice", &create.build(dialect)?);
    }

    let send = Update::new()
        .table("invoices")
        .set("status", "sent")
        .set("sent_at", "2024-01-15 09:00:00")
        .where_("id", [1001])
        .and_where("status", ["draft"])
        .build(dialect)?;
    print_sql("Mark invoice as sent", &send);

    let cleanup = Delete::new()
        .from("invoices")
        .where_("company_id", [company_id])
        .and_where("status", ["void"])
        .and_where("created_at <", ["2023-01-01"])
        .build(dialect)?;
    print_sql("Purge old void invoices", &cleanup);
    Ok(())
}

fn main() -> sqlweave_core::Result<()> {
    let name = std::env::args().nth(1).unwrap_or_else(|| String::from("postgres"));
    let dialect = resolve_dialect(&name);
    let company_id = 1_i64;

    println!("-- =============================================================================");
    println!("-- INVOICING SYSTEM - SQL QUERIES ({})", dialect.name());
    println!("-- =============================================================================");
    println!();

    dashboard(dialect, company_id)?;
    clients(dialect, company_id)?;
    lifecycle(dialect, company_id)
}
