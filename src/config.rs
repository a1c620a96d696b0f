//! Declarative column filters.
//!
//! ```json
//! [
//!   {
//!     "key": "roas_strong",
//!     "destination": "roas_strong",
//!     "column": "roas_ads_l30d",
//!     "value": 3,
//!     "operator": ">="
//!   }
//! ]
//! ```

use serde::Deserialize;

use crate::data::filter::{build_column_predicate, Operator};
use crate::data::model::CellValue;
use crate::error::Result;
use crate::registry::{FilterRegistry, NewFilter};

/// One column filter as written in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnFilterConfig {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Left optional so a missing destination is reported by `add`.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub column: String,
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub operator: Operator,
}

impl ColumnFilterConfig {
    pub fn into_new_filter(self) -> (String, NewFilter) {
        let predicate = build_column_predicate(self.column, self.value, self.operator);
        let filter = NewFilter {
            name: self.name,
            destination: self.destination,
            description: self.description,
            predicate: Some(predicate),
        };
        (self.key, filter)
    }
}

/// Parse a JSON array of [`ColumnFilterConfig`]s.
pub fn parse_column_filters(json: &str) -> Result<Vec<ColumnFilterConfig>> {
    Ok(serde_json::from_str(json)?)
}

impl FilterRegistry {
    /// Add every column filter described by `json` through [`FilterRegistry::add`].
    ///
    /// Stops at the first invalid entry; earlier entries stay registered.
    /// Returns the number of filters added.
    pub fn add_column_filters_json(&mut self, json: &str) -> Result<usize> {
        let configs = parse_column_filters(json)?;
        let count = configs.len();
        for config in configs {
            let (key, filter) = config.into_new_filter();
            self.add(key, filter)?;
        }
        Ok(count)
    }
}
