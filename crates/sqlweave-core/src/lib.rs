//! # sqlweave-core
//!
//! Dialect-aware SQL text construction.
//!
//! This crate turns loosely written expressions into SQL strings plus an
//! ordered argument list ready for a driver. It never talks to a database.
//! It provides:
//! - Tokens parsed from strings such as `"users.id AS uid"`, validated at
//!   construction and rendered per dialect
//! - Conditions resolved from `"age >= 18"` or `("id", [1, 2, 3])`, with
//!   value-count and type checks for `IN` and `BETWEEN`
//! - A parameter binder that keeps `$n` numbering continuous across clauses
//! - Dialects for PostgreSQL, MySQL, SQLite and SQL Server, plus custom
//!   dialects loaded from JSON
//! - Typestate builders for SELECT, INSERT, UPDATE, DELETE and upserts
//!
//! ## Building statements
//!
//! ```rust
//! use sqlweave_core::{resolve_dialect, SqlValue, Update};
//!
//! let (sql, args) = Update::new()
//!     .table("users")
//!     .set("name", "Bob")
//!     .where_("id", [42])
//!     .build(resolve_dialect("postgres"))
//!     .unwrap();
//!
//! assert_eq!(sql, r#"UPDATE "users" SET "name" = $1 WHERE "id" = $2"#);
//! assert_eq!(args, vec![SqlValue::Text("Bob".into()), SqlValue::Int(42)]);
//! ```
//!
//! ## Errors are reported per clause
//!
//! Invalid input never panics and never fails early. Each token and
//! condition carries its own error, and `build()` returns all of them at
//! once, grouped by clause:
//!
//! ```rust
//! use sqlweave_core::{resolve_dialect, Select};
//!
//! let err = Select::new()
//!     .columns(&["id", "AS name"])
//!     .from("users")
//!     .where_("price BETWEEN ? AND ?", [10])
//!     .build(resolve_dialect("generic"))
//!     .unwrap_err();
//!
//! assert_eq!(
//!     err.to_string(),
//!     "COLUMNS: expression \"AS name\" cannot start with 'AS'\n\
//!      WHERE: BETWEEN requires exactly 2 values, got 1"
//! );
//! ```

pub mod binder;
pub mod builder;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod parser;
pub mod stage;
pub mod token;
pub mod value;

pub use binder::ParamBinder;
pub use builder::{Delete, Insert, JoinKind, Select, Update, Upsert};
pub use condition::{new_condition, render_conditions, Condition, LogicalType, Operator};
pub use dialect::{
    builtin_dialects, resolve_dialect, CustomDialect, Dialect, DialectOptions, PlaceholderStyle,
    QuoteStyle,
};
pub use error::{Error, Result};
pub use stage::{Stage, StageErrors, StageReport};
pub use token::{new_token, Column, Renderable, Table, Token, TokenKind, Validatable};
pub use value::{are_compatible_types, infer_literal, SqlValue, ToSqlValue, ValueGroup};
