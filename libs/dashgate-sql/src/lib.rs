#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Bound-parameter statement building for SQL Server family backends.
//!
//! Statement text is assembled only from `'static` fragments and quoted
//! identifiers. Every runtime value goes through [`StatementBuilder::bind`],
//! which emits a positional `@pN` placeholder and records the value in the
//! statement's parameter list.
//!
//! ```
//! use dashgate_sql::{SqlValue, select_all_where_eq};
//!
//! let stmt = select_all_where_eq("Orders", "OrderId", "10248' OR 1=1 --").unwrap();
//! assert_eq!(stmt.sql(), "SELECT * FROM [Orders] WHERE [OrderId] = @p1");
//! assert_eq!(stmt.param("@p1"), Some(&SqlValue::from("10248' OR 1=1 --")));
//! ```

pub mod error;
pub mod ident;
pub mod statement;
pub mod value;

pub use error::SqlError;
pub use ident::quote_ident;
pub use statement::{BoundParam, BoundStatement, StatementBuilder, select_all, select_all_where_eq};
pub use value::SqlValue;
