//! Tests for statement builders across dialects.

mod common;
use common::*;

use sqlweave_core::{Delete, Error, Insert, Select, SqlValue, Stage, Update};

#[test]
fn select_with_every_clause() {
    let (sql, args) = built(
        Select::new()
            .columns(&["u.id", "COUNT(o.id) AS orders"])
            .from("users u")
            .left_join("orders o", "o.user_id", "u.id")
            .where_("u.active", [true])
            .group_by(&["u.id"])
            .having("COUNT(o.id) >", [5])
            .order_by_desc(&["orders"])
            .limit(10)
            .offset(20)
            .build(postgres()),
    );

    assert_eq!(
        sql,
        concat!(
            r#"SELECT "u"."id", COUNT(o.id) AS "orders" FROM "users" AS "u" "#,
            r#"LEFT JOIN "orders" AS "o" ON "o"."user_id" = "u"."id" "#,
            r#"WHERE "u"."active" = $1 GROUP BY "u"."id" HAVING COUNT(o.id) > $2 "#,
            r#"ORDER BY "orders" DESC LIMIT 10 OFFSET 20"#,
        )
    );
    assert_eq!(args, vec![SqlValue::Bool(true), SqlValue::Int(5)]);
}

#[test]
fn select_status_filter_generic() {
    let (sql, args) = built(
        Select::new()
            .columns(&["id"])
            .from("users")
            .where_("status = ?", ["active"])
            .and_where("deleted = ?", [false])
            .build(generic()),
    );
    assert_eq!(sql, "SELECT id FROM users WHERE status = ? AND deleted = ?");
    assert_eq!(args, vec![text("active"), SqlValue::Bool(false)]);
}

#[test]
fn select_distinct_mssql_pagination() {
    let (sql, _) = built(
        Select::new()
            .distinct()
            .columns(&["name"])
            .from("users")
            .order_by(&["name"])
            .limit(5)
            .offset(10)
            .build(mssql()),
    );
    assert_eq!(
        sql,
        "SELECT DISTINCT [name] FROM [users] ORDER BY [name] OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
    );
}

#[test]
fn cte_arguments_come_first() {
    let recent = Select::new()
        .columns(&["user_id"])
        .from("orders")
        .where_("total >", [100]);
    let (sql, args) = built(
        Select::new()
            .with_cte("recent", recent)
            .columns(&["id"])
            .from("users")
            .where_("status", ["active"])
            .build(postgres()),
    );
    assert_eq!(
        sql,
        concat!(
            r#"WITH "recent" AS (SELECT "user_id" FROM "orders" WHERE "total" > $1) "#,
            r#"SELECT "id" FROM "users" WHERE "status" = $2"#,
        )
    );
    assert_eq!(args, vec![SqlValue::Int(100), text("active")]);
}

#[test]
fn select_collects_errors_by_stage() {
    let report = report(
        Select::new()
            .columns(&["a, b", "AS x", "ok"])
            .from("")
            .where_("id", Vec::<SqlValue>::new())
            .and_where("price BETWEEN ? AND ?", [1])
            .order_by(&[""])
            .build(generic()),
    );

    assert_stage_count(&report, Stage::Columns, 2);
    assert_stage_count(&report, Stage::From, 1);
    assert_stage_count(&report, Stage::Where, 2);
    assert_stage_count(&report, Stage::OrderBy, 1);
    assert_eq!(report.len(), 6);

    let stages: Vec<Stage> = report.stages().map(|(stage, _)| stage).collect();
    assert_eq!(
        stages,
        [Stage::Columns, Stage::From, Stage::Where, Stage::OrderBy]
    );
    assert!(report.to_string().starts_with(
        "COLUMNS:\n  - aliases must not be comma-separated: \"a, b\"\n  - expression \"AS x\" cannot start with 'AS'\n"
    ));
}

#[test]
fn insert_rows_and_returning() {
    let (sql, args) = built(
        Insert::new()
            .into("users")
            .columns(&["name", "age"])
            .values([text("Alice"), SqlValue::Int(30)])
            .values([text("Bob"), SqlValue::Null])
            .returning(&["id"])
            .build(postgres()),
    );
    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("name", "age") VALUES ($1, $2), ($3, $4) RETURNING "id""#
    );
    assert_eq!(args.len(), 4);
    assert_eq!(args[3], SqlValue::Null);
}

#[test]
fn insert_value_count_mismatch() {
    let report = report(
        Insert::new()
            .into("users")
            .columns(&["name", "age"])
            .values(["Alice"])
            .returning(&["id"])
            .build(mysql()),
    );
    assert_eq!(
        report.errors(Stage::Values),
        &[Error::ValueCountMismatch {
            expected: 2,
            found: 1
        }]
    );
    assert_eq!(
        report.errors(Stage::Returning),
        &[Error::Unsupported {
            dialect: String::from("mysql"),
            feature: "RETURNING",
        }]
    );
}

#[test]
fn insert_without_rows() {
    let report = report(Insert::new().into("users").columns(&["name"]).build(sqlite()));
    assert_eq!(report.errors(Stage::Values), &[Error::MissingClause("VALUES")]);
}

#[test]
fn upsert_per_dialect() {
    let insert = Insert::new()
        .into("users")
        .columns(&["email", "name"])
        .values(["a@example.com", "A"]);

    let (sql, _) = built(
        insert
            .clone()
            .on_conflict(&["email"])
            .do_update(&["name"])
            .build(postgres()),
    );
    assert_eq!(
        sql,
        concat!(
            r#"INSERT INTO "users" ("email", "name") VALUES ($1, $2) "#,
            r#"ON CONFLICT ("email") DO UPDATE SET "name" = EXCLUDED."name""#,
        )
    );

    let (sql, _) = built(insert.clone().on_conflict(&["email"]).build(sqlite()));
    assert!(sql.ends_with(r#"ON CONFLICT ("email") DO NOTHING"#), "{sql}");

    let (sql, _) = built(
        insert
            .clone()
            .on_conflict(&["email"])
            .do_update(&["name"])
            .build(mysql()),
    );
    assert!(
        sql.ends_with("ON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"),
        "{sql}"
    );

    let report = report(insert.on_conflict(&["email"]).build(mssql()));
    assert_eq!(
        report.errors(Stage::Upsert),
        &[Error::Unsupported {
            dialect: String::from("mssql"),
            feature: "UPSERT",
        }]
    );
}

#[test]
fn update_numbering_spans_set_and_where() {
    let (sql, args) = built(
        Update::new()
            .table("accounts")
            .set("balance", 10.5)
            .set("note", "refund")
            .where_("id IN ?", [1, 2])
            .returning(&["id", "balance"])
            .build(postgres()),
    );
    assert_eq!(
        sql,
        concat!(
            r#"UPDATE "accounts" SET "balance" = $1, "note" = $2 "#,
            r#"WHERE "id" IN ($3, $4) RETURNING "id", "balance""#,
        )
    );
    assert_eq!(
        args,
        vec![
            SqlValue::Float(10.5),
            text("refund"),
            SqlValue::Int(1),
            SqlValue::Int(2),
        ]
    );
}

#[test]
fn update_reports_empty_table() {
    let report = report(Update::new().table(" ").set("a", 1).build(generic()));
    assert_eq!(report.errors(Stage::Table), &[Error::EmptyExpression]);
}

#[test]
fn delete_filters_and_returning() {
    let (sql, args) = built(
        Delete::new()
            .from("sessions s")
            .where_("s.expires_at <", ["2024-01-01"])
            .or_where("s.revoked", [true])
            .build(mssql()),
    );
    assert_eq!(
        sql,
        "DELETE FROM [sessions] AS [s] WHERE [s].[expires_at] < @p1 OR [s].[revoked] = @p2"
    );
    assert_eq!(args.len(), 2);

    let report = report(
        Delete::new()
            .from("sessions")
            .returning(&["id"])
            .build(mssql()),
    );
    assert_stage_count(&report, Stage::Returning, 1);
}

#[test]
fn aliases_rejected_where_plain_columns_are_required() {
    let alias = |raw: &str| Error::UnexpectedAlias(String::from(raw));

    let report = report(
        Insert::new()
            .into("users")
            .columns(&["name AS n"])
            .values(["x"])
            .build(postgres()),
    );
    assert_eq!(report.errors(Stage::Columns), &[alias("name AS n")]);

    let report = common::report(Update::new().table("users").set("name AS n", "x").build(postgres()));
    assert_eq!(report.errors(Stage::Set), &[alias("name AS n")]);

    let report = common::report(
        Select::new()
            .from("users u")
            .inner_join("orders o", "o.user_id AS uid", "u.id")
            .group_by(&["u.id AS id"])
            .order_by(&["name AS n"])
            .build(postgres()),
    );
    assert_eq!(report.errors(Stage::Join), &[alias("user_id AS uid")]);
    assert_eq!(report.errors(Stage::GroupBy), &[alias("id AS id")]);
    assert_eq!(report.errors(Stage::OrderBy), &[alias("name AS n")]);

    let report = common::report(
        Insert::new()
            .into("users")
            .columns(&["email", "name"])
            .values(["a@example.com", "A"])
            .on_conflict(&["email e"])
            .do_update(&["name AS n"])
            .build(sqlite()),
    );
    assert_eq!(
        report.errors(Stage::Upsert),
        &[alias("email AS e"), alias("name AS n")]
    );
}

#[test]
fn selected_columns_keep_their_aliases() {
    let (sql, _) = built(
        Select::new()
            .columns(&["name AS n"])
            .from("users")
            .order_by(&["n"])
            .build(postgres()),
    );
    assert_eq!(sql, r#"SELECT "name" AS "n" FROM "users" ORDER BY "n""#);
}

#[test]
fn upsert_update_needs_conflict_target() {
    let insert = Insert::new()
        .into("users")
        .columns(&["email", "name"])
        .values(["a@example.com", "A"]);

    for dialect in [postgres(), sqlite()] {
        let report = report(insert.clone().on_conflict(&[]).do_update(&["name"]).build(dialect));
        assert_eq!(
            report.errors(Stage::Upsert),
            &[Error::MissingClause("ON CONFLICT")]
        );
    }

    // MySQL resolves conflicts through unique keys.
    let (sql, _) = built(insert.on_conflict(&[]).do_update(&["name"]).build(mysql()));
    assert!(
        sql.ends_with("ON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"),
        "{sql}"
    );
}

#[test]
fn upsert_strips_qualifiers() {
    let upsert = Insert::new()
        .into("users")
        .columns(&["id", "name"])
        .values([SqlValue::Int(1), text("A")])
        .on_conflict(&["users.id"])
        .do_update(&["users.name"]);

    let (sql, _) = built(upsert.build(postgres()));
    assert!(
        sql.ends_with(r#"ON CONFLICT ("id") DO UPDATE SET "name" = EXCLUDED."name""#),
        "{sql}"
    );

    let (sql, _) = built(upsert.build(mysql()));
    assert!(
        sql.ends_with("ON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"),
        "{sql}"
    );
}
