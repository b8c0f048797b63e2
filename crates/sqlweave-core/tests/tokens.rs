//! Tests for token parsing, validation and rendering.

mod common;
use common::*;

use sqlweave_core::parser::{parse_alias, parse_table_column};
use sqlweave_core::{new_token, Column, Error, Renderable, Table, TokenKind, Validatable};

#[test]
fn alias_round_trips_through_raw() {
    for (name, alias) in [
        ("id", "uid"),
        ("users.id", "user_id"),
        ("COUNT(*)", "total"),
        ("CAST(price AS INT)", "p"),
    ] {
        let expr = format!("{name} AS {alias}");
        assert_eq!(parse_alias(&expr), (String::from(name), String::from(alias)));
        assert_eq!(new_token(&expr, None).raw(), expr);
    }
}

#[test]
fn alias_keyword_is_case_insensitive() {
    let expected = (String::from("total"), String::from("t"));
    assert_eq!(parse_alias("total as t"), expected);
    assert_eq!(parse_alias("total\tAs\tt"), expected);
}

#[test]
fn table_column_split() {
    assert_eq!(
        parse_table_column(" orders.total "),
        (String::from("orders"), String::from("total"))
    );
    assert_eq!(
        parse_table_column("total"),
        (String::new(), String::from("total"))
    );
}

#[test]
fn malformed_tokens_are_invalid() {
    for expr in ["", "   ", "a, b", "AS x", "as"] {
        let token = new_token(expr, None);
        assert!(token.error().is_some(), "{expr:?} should carry an error");
        assert!(!token.is_valid(), "{expr:?} should be invalid");
    }
}

#[test]
fn explicit_alias_policy() {
    let same = new_token("id AS uid", Some("uid"));
    assert!(same.is_valid());
    assert!(same.error().is_none());

    let conflict = new_token("id AS uid", Some("other"));
    assert_eq!(conflict.alias(), "other");
    assert!(matches!(
        conflict.error(),
        Some(Error::AliasConflict { explicit, inline }) if explicit == "other" && inline == "uid"
    ));
    assert_eq!(
        conflict.error().map(ToString::to_string).as_deref(),
        Some(r#"explicit alias "other" does not match inline alias "uid""#)
    );

    let only_explicit = new_token("id", Some("uid"));
    assert!(only_explicit.is_valid());
    assert_eq!(only_explicit.raw(), "id AS uid");
}

#[test]
fn token_kinds() {
    assert_eq!(new_token("x", None).kind(), TokenKind::Unknown);
    assert_eq!(Column::new("x").token().kind(), TokenKind::Column);
}

#[test]
fn column_rendering_per_dialect() {
    let col = Column::new("o.total AS amount");
    assert_eq!(col.render(generic()), "o.total AS amount");
    assert_eq!(col.render(postgres()), r#""o"."total" AS "amount""#);
    assert_eq!(col.render(mysql()), "`o`.`total` AS `amount`");
    assert_eq!(col.render(sqlite()), r#""o"."total" AS "amount""#);
    assert_eq!(col.render(mssql()), "[o].[total] AS [amount]");
}

#[test]
fn expressions_render_verbatim() {
    assert_eq!(
        Column::new("price * quantity AS line_total").render(postgres()),
        r#"price * quantity AS "line_total""#
    );
    assert_eq!(Column::new("SUM(o.total)").render(mysql()), "SUM(o.total)");
}

#[test]
fn embedded_quote_characters_are_doubled() {
    assert_eq!(postgres().quote_identifier("we\"ird"), "\"we\"\"ird\"");
}

#[test]
fn table_qualification() {
    let orders = Table::new("orders o");
    let col = Column::new("total").qualified_by(&orders);
    assert_eq!(col.render(postgres()), r#""o"."total""#);

    let again = col.clone().qualified_by(&orders);
    assert!(again.is_valid());

    let wrong = col.with_table("users");
    assert_eq!(wrong.table(), Some("o"));
    assert!(matches!(wrong.error(), Some(Error::TableMismatch { .. })));
}
