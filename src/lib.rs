//! sheet-filters - named row filters for splitting a sheet into views.
//!
//! A [`FilterRegistry`] maps keys to [`FilterDefinition`]s. Each definition
//! pairs a predicate over `(row, headers)` with the destination sheet that
//! matching rows belong on. Columns are always looked up by header name, and
//! a missing column makes a predicate `false` rather than an error.

pub mod builtin;
pub mod config;
pub mod data;
pub mod error;
pub mod registry;

pub use config::ColumnFilterConfig;
pub use data::filter::{build_column_predicate, predicate, Operator, Predicate};
pub use data::model::{parse_float, CellValue, Headers, Row, Table};
pub use error::{Error, Result};
pub use registry::{FilterDefinition, FilterRegistry, FilterSummary, NewFilter};
