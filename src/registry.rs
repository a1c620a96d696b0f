use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

use crate::builtin;
use crate::data::filter::{self, Predicate};
use crate::data::model::{Headers, Row, Table};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// FilterDefinition – a predicate plus its routing metadata
// ---------------------------------------------------------------------------

/// A registered filter: rows accepted by `predicate` belong on `destination`.
#[derive(Clone)]
pub struct FilterDefinition {
    /// Registry key, unique within a registry.
    pub key: String,
    /// Human-readable label.
    pub name: String,
    /// Sheet that matching rows are routed to.
    pub destination: String,
    pub description: String,
    pub predicate: Predicate,
}

impl FilterDefinition {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        destination: impl Into<String>,
        description: impl Into<String>,
        predicate: Predicate,
    ) -> Self {
        FilterDefinition {
            key: key.into(),
            name: name.into(),
            destination: destination.into(),
            description: description.into(),
            predicate,
        }
    }

    /// Evaluate the predicate against one row.
    pub fn matches(&self, row: &Row, headers: &Headers) -> bool {
        (self.predicate)(row, headers)
    }

    /// Indices of the rows in `table` this filter accepts.
    pub fn select(&self, table: &Table) -> Vec<usize> {
        filter::matching_indices(table, &self.predicate)
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            key: self.key.clone(),
            name: self.name.clone(),
            destination: self.destination.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Debug for FilterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDefinition")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("destination", &self.destination)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Display metadata of a filter, without its predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub key: String,
    pub name: String,
    pub destination: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// NewFilter – loosely specified input to `FilterRegistry::add`
// ---------------------------------------------------------------------------

/// Definition handed to [`FilterRegistry::add`].
///
/// Every field is optional here; `add` rejects a missing predicate or
/// destination and fills in `name` and `description` when absent.
#[derive(Clone, Default)]
pub struct NewFilter {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub description: Option<String>,
    pub predicate: Option<Predicate>,
}

impl NewFilter {
    /// A definition with the two required parts set.
    pub fn new(destination: impl Into<String>, predicate: Predicate) -> Self {
        NewFilter {
            destination: Some(destination.into()),
            predicate: Some(predicate),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<FilterDefinition> for NewFilter {
    fn from(def: FilterDefinition) -> Self {
        NewFilter {
            name: Some(def.name),
            destination: Some(def.destination),
            description: Some(def.description),
            predicate: Some(def.predicate),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterRegistry
// ---------------------------------------------------------------------------

/// Keyed collection of [`FilterDefinition`]s, iterated in insertion order.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterDefinition>,
    // Insertion order; an overwritten key keeps its slot.
    order: Vec<String>,
}

impl FilterRegistry {
    /// A registry seeded with the built-in filters.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for def in builtin::seed() {
            registry.insert(def);
        }
        registry
    }

    /// A registry with no filters at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    /// Look up a filter by key.
    pub fn get(&self, key: &str) -> Result<&FilterDefinition> {
        self.filters
            .get(key)
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    /// Mutable access to a registered filter. Edits made here skip the
    /// checks `add` performs; use [`FilterRegistry::validate`] afterwards.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut FilterDefinition> {
        self.filters.get_mut(key)
    }

    /// The live key → definition mapping.
    pub fn get_all(&self) -> &HashMap<String, FilterDefinition> {
        &self.filters
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterDefinition> {
        self.order.iter().filter_map(|key| self.filters.get(key))
    }

    /// Entries whose key's first `_`-delimited segment is exactly `category`,
    /// in insertion order.
    pub fn get_by_category(&self, category: &str) -> Vec<(&str, &FilterDefinition)> {
        self.order
            .iter()
            .filter(|key| category_of(key) == Some(category))
            .filter_map(|key| self.filters.get(key).map(|def| (key.as_str(), def)))
            .collect()
    }

    /// Distinct first segments of every key containing an underscore.
    pub fn list_categories(&self) -> BTreeSet<String> {
        self.order
            .iter()
            .filter_map(|key| category_of(key))
            .map(str::to_string)
            .collect()
    }

    /// Register `filter` under `key`, replacing any existing entry.
    ///
    /// Fails when the predicate or a non-empty destination is missing.
    pub fn add(&mut self, key: impl Into<String>, filter: NewFilter) -> Result<()> {
        let key = key.into();
        let predicate = filter.predicate.ok_or_else(|| {
            Error::Validation(format!("filter '{key}' must include a predicate"))
        })?;
        let destination = filter
            .destination
            .filter(|d| !d.is_empty())
            .ok_or_else(|| {
                Error::Validation(format!("filter '{key}' must include a destination"))
            })?;

        if self.contains(&key) {
            log::warn!("Filter '{key}' already exists, overwriting");
        }

        let def = FilterDefinition {
            name: filter.name.unwrap_or_else(|| key.clone()),
            description: filter
                .description
                .unwrap_or_else(|| format!("Custom filter: {key}")),
            destination,
            predicate,
            key,
        };
        log::info!("Custom filter '{}' added successfully", def.key);
        self.insert(def);
        Ok(())
    }

    /// Remove `key` if registered. Removing an unknown key only logs a warning.
    pub fn remove(&mut self, key: &str) -> Option<FilterDefinition> {
        match self.filters.remove(key) {
            Some(def) => {
                self.order.retain(|k| k != key);
                log::info!("Filter '{key}' removed");
                Some(def)
            }
            None => {
                log::warn!("Filter '{key}' not found");
                None
            }
        }
    }

    /// Whether `key` is registered with a usable definition. Never fails;
    /// problems are logged and reported as `false`.
    pub fn validate(&self, key: &str) -> bool {
        match self.check(key) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Filter validation failed for '{key}': {e}");
                false
            }
        }
    }

    fn check(&self, key: &str) -> Result<()> {
        let def = self.get(key)?;
        if def.destination.is_empty() {
            return Err(Error::Validation("filter must have a destination".into()));
        }
        Ok(())
    }

    /// Summaries of every filter, in insertion order.
    pub fn list(&self) -> Vec<FilterSummary> {
        self.iter().map(FilterDefinition::summary).collect()
    }

    /// Add a `content_<name>` filter per content creator and a `dm_<name>`
    /// filter per digital marketer, skipping keys already registered.
    ///
    /// Returns how many filters were added.
    pub fn generate_team_filters(&mut self) -> usize {
        let creators = builtin::CONTENT_CREATORS.iter().map(|creator| {
            NewFilter::new(
                format!("content_{}", creator.to_lowercase()),
                filter::equals("content", *creator),
            )
            .name(format!("{creator} Content"))
            .description(format!("Filter for {creator} content campaigns"))
        });
        let dms = builtin::DIGITAL_MARKETERS.iter().map(|dm| {
            NewFilter::new(
                format!("dm_{}", dm.to_lowercase()),
                filter::equals("dm", *dm),
            )
            .name(format!("{dm} DM Campaigns"))
            .description(format!("Filter for campaigns managed by {dm}"))
        });

        let mut added = 0;
        for new_filter in creators.chain(dms) {
            // Keys and destinations coincide for team filters.
            let Some(key) = new_filter.destination.clone() else {
                continue;
            };
            if self.contains(&key) {
                continue;
            }
            match self.add(key, new_filter) {
                Ok(()) => added += 1,
                Err(e) => log::error!("Team filter rejected: {e}"),
            }
        }
        log::info!(
            "Generated team filters: {added} added for {} content creators and {} DMs",
            builtin::CONTENT_CREATORS.len(),
            builtin::DIGITAL_MARKETERS.len()
        );
        added
    }

    /// The filter for a squad such as `"AREA 2"`, if any.
    ///
    /// Tries `squad_area_2` first, then the built-in spelling `squad_area2`.
    pub fn squad_filter(&self, squad_name: &str) -> Option<&FilterDefinition> {
        let name = squad_name.to_lowercase();
        self.filters
            .get(&format!("squad_{}", name.replace(' ', "_")))
            .or_else(|| self.filters.get(&format!("squad_{}", name.replace(' ', ""))))
    }

    /// Evaluate every filter over `table`, in registry order.
    pub fn route<'a>(&'a self, table: &Table) -> Vec<(&'a FilterDefinition, Vec<usize>)> {
        self.iter()
            .map(|def| {
                let rows = def.select(table);
                log::debug!(
                    "Filter '{}' selected {} of {} rows for '{}'",
                    def.key,
                    rows.len(),
                    table.len(),
                    def.destination
                );
                (def, rows)
            })
            .collect()
    }

    /// Known content creator names.
    pub fn content_creators() -> &'static [&'static str] {
        builtin::CONTENT_CREATORS
    }

    /// Known digital marketer names.
    pub fn digital_marketers() -> &'static [&'static str] {
        builtin::DIGITAL_MARKETERS
    }

    /// Known squad names.
    pub fn squads() -> &'static [&'static str] {
        builtin::SQUADS
    }

    fn insert(&mut self, def: FilterDefinition) {
        if !self.filters.contains_key(&def.key) {
            self.order.push(def.key.clone());
        }
        self.filters.insert(def.key.clone(), def);
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// First `_`-delimited segment of `key`, if it has an underscore at all.
fn category_of(key: &str) -> Option<&str> {
    key.split_once('_').map(|(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{build_column_predicate, equals};
    use crate::data::model::CellValue;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn keys(entries: &[(&str, &FilterDefinition)]) -> Vec<String> {
        entries
            .iter()
            .map(|(key, def)| {
                assert_eq!(*key, def.key);
                key.to_string()
            })
            .collect()
    }

    #[test]
    fn test_builtins_are_valid() {
        init();
        let registry = FilterRegistry::new();
        assert_eq!(registry.len(), 25);
        for def in registry.iter() {
            assert!(!registry.get(&def.key).unwrap().destination.is_empty());
            assert!(registry.validate(&def.key), "{}", def.key);
        }
    }

    #[test]
    fn test_get_missing_key() {
        let registry = FilterRegistry::new();
        let err = registry.get("squad_mars").unwrap_err();
        assert!(matches!(err, Error::NotFound(ref k) if k == "squad_mars"));
    }

    #[test]
    fn test_get_by_category() {
        let registry = FilterRegistry::new();
        assert_eq!(
            keys(&registry.get_by_category("squad")),
            vec![
                "squad_area1",
                "squad_area2",
                "squad_area3",
                "squad_program",
                "squad_hospital",
                "squad_inbound"
            ]
        );
        assert!(registry.get_by_category("SQUAD").is_empty());
        assert!(registry.get_by_category("nope").is_empty());
        assert_eq!(keys(&registry.get_by_category("kevin")), vec!["kevin_squad"]);
    }

    #[test]
    fn test_list_categories() {
        let mut registry = FilterRegistry::new();
        registry
            .add("standalone", NewFilter::new("standalone", equals("SQUAD", "X")))
            .unwrap();
        let categories = registry.list_categories();
        for c in [
            "squad", "content", "dm", "isu", "visual", "high", "low", "active", "paused",
        ] {
            assert!(categories.contains(c), "missing {c}");
        }
        assert!(!categories.contains("standalone"));
    }

    #[test]
    fn test_add_round_trips_and_defaults() {
        init();
        let mut registry = FilterRegistry::empty();
        registry
            .add("roas_mid", NewFilter::new("mid", build_column_predicate("roas_ads_l30d", "1.0", ">=")))
            .unwrap();
        let def = registry.get("roas_mid").unwrap();
        assert_eq!(def.key, "roas_mid");
        assert_eq!(def.name, "roas_mid");
        assert_eq!(def.destination, "mid");
        assert_eq!(def.description, "Custom filter: roas_mid");
        assert!(def.matches(&["1.0".into()], &headers(&["roas_ads_l30d"])));
    }

    #[test]
    fn test_add_overwrites_in_place() {
        init();
        let mut registry = FilterRegistry::new();
        let position = |r: &FilterRegistry| r.list().iter().position(|s| s.key == "dm_kevin");
        let before = position(&registry);

        registry
            .add(
                "dm_kevin",
                NewFilter::new("kevin_only", equals("dm", "KEVIN")).name("Kevin"),
            )
            .unwrap();
        registry
            .add(
                "dm_kevin",
                NewFilter::new("kevin_v2", equals("dm", "KEVIN")).description("second"),
            )
            .unwrap();

        let def = registry.get("dm_kevin").unwrap();
        assert_eq!(def.destination, "kevin_v2");
        assert_eq!(def.description, "second");
        assert_eq!(def.name, "dm_kevin");
        assert_eq!(registry.len(), 25);
        assert_eq!(position(&registry), before);
    }

    #[test]
    fn test_readd_existing_definition_under_new_key() {
        let mut registry = FilterRegistry::new();
        let copy = registry.get("squad_area1").unwrap().clone();
        registry.add("area1_copy", NewFilter::from(copy)).unwrap();

        let def = registry.get("area1_copy").unwrap();
        assert_eq!(def.key, "area1_copy");
        assert_eq!(def.name, "Squad AREA 1");
        assert_eq!(def.destination, "squad_area1");
        assert!(def.matches(&["AREA 1".into()], &headers(&["SQUAD"])));
        assert_eq!(registry.list().last().unwrap().key, "area1_copy");
    }

    #[test]
    fn test_add_rejects_incomplete_definitions() {
        let mut registry = FilterRegistry::empty();

        let no_predicate = NewFilter {
            destination: Some("sheet".into()),
            ..Default::default()
        };
        assert!(matches!(registry.add("a", no_predicate), Err(Error::Validation(_))));

        let no_destination = NewFilter {
            predicate: Some(equals("dm", "KEVIN")),
            ..Default::default()
        };
        assert!(matches!(registry.add("b", no_destination), Err(Error::Validation(_))));

        let empty_destination = NewFilter::new("", equals("dm", "KEVIN"));
        assert!(matches!(registry.add("c", empty_destination), Err(Error::Validation(_))));

        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove() {
        init();
        let mut registry = FilterRegistry::new();
        let before = registry.list();

        assert!(registry.remove("no_such_filter").is_none());
        assert_eq!(registry.list(), before);

        let removed = registry.remove("high_spend").unwrap();
        assert_eq!(removed.key, "high_spend");
        assert!(!registry.contains("high_spend"));
        assert_eq!(registry.len(), before.len() - 1);
        assert!(registry.list().iter().all(|s| s.key != "high_spend"));
    }

    #[test]
    fn test_validate_never_fails() {
        init();
        let mut registry = FilterRegistry::new();
        assert!(!registry.validate("no_such_filter"));

        registry.get_mut("isu_active").unwrap().destination.clear();
        assert!(!registry.validate("isu_active"));
        assert!(registry.validate("visual_active"));
    }

    #[test]
    fn test_list_in_insertion_order() {
        let mut registry = FilterRegistry::new();
        registry
            .add("zz_last", NewFilter::new("zz", equals("dm", "KEVIN")))
            .unwrap();
        let list = registry.list();
        assert_eq!(list.first().unwrap().key, "kevin_squad");
        assert_eq!(list[1].key, "squad_area1");
        assert_eq!(list.last().unwrap().key, "zz_last");
        assert_eq!(
            list[0],
            FilterSummary {
                key: "kevin_squad".into(),
                name: "Kevin Squad (AREA 2)".into(),
                destination: "campaign".into(),
                description: "Filter for AREA 2 squad data (Kevin's team)".into(),
            }
        );
        let json = serde_json::to_value(&list[0]).unwrap();
        assert_eq!(json["destination"], "campaign");
    }

    #[test]
    fn test_generate_team_filters_is_idempotent() {
        init();
        let mut registry = FilterRegistry::new();
        let monica = registry.get("content_monica").unwrap().name.clone();

        let added = registry.generate_team_filters();
        // 3 creators and 5 DMs are already seeded.
        assert_eq!(added, 41 - 3 + 19 - 5);
        assert_eq!(registry.len(), 25 + added);
        assert_eq!(registry.get("content_monica").unwrap().name, monica);

        let generated = registry.get("content_vora").unwrap();
        assert_eq!(generated.name, "VORA Content");
        assert_eq!(generated.destination, "content_vora");
        let h = headers(&["content"]);
        assert!(generated.matches(&["VORA".into()], &h));
        assert!(!generated.matches(&["vora".into()], &h));
        assert!(registry.get("dm_nabilah").unwrap().matches(&["NABILAH".into()], &headers(&["dm"])));

        let snapshot = registry.list();
        assert_eq!(registry.generate_team_filters(), 0);
        assert_eq!(registry.list(), snapshot);
    }

    #[test]
    fn test_generate_keeps_manual_entries() {
        let mut registry = FilterRegistry::empty();
        registry
            .add("dm_fahmi", NewFilter::new("custom", equals("dm", "FAHMI")).name("Manual"))
            .unwrap();
        registry.generate_team_filters();
        assert_eq!(registry.get("dm_fahmi").unwrap().name, "Manual");
    }

    #[test]
    fn test_squad_filter() {
        let registry = FilterRegistry::new();
        let by_squad = registry.squad_filter("AREA 2").unwrap();
        let by_key = registry.get("squad_area2").unwrap();
        assert_eq!(by_squad.key, by_key.key);
        assert!(std::sync::Arc::ptr_eq(&by_squad.predicate, &by_key.predicate));
        assert_eq!(registry.squad_filter("Hospital").unwrap().key, "squad_hospital");
        assert!(registry.squad_filter("AREA 9").is_none());

        let mut registry = registry;
        registry
            .add("squad_area_2", NewFilter::new("area_2", equals("SQUAD", "AREA 2")))
            .unwrap();
        assert_eq!(registry.squad_filter("AREA 2").unwrap().key, "squad_area_2");
    }

    #[test]
    fn test_static_rosters() {
        assert_eq!(FilterRegistry::content_creators().len(), 41);
        assert_eq!(FilterRegistry::digital_marketers().len(), 19);
        assert_eq!(FilterRegistry::squads(), FilterRegistry::squads());
        for squad in FilterRegistry::squads() {
            assert!(FilterRegistry::new().squad_filter(squad).is_some(), "{squad}");
        }
    }

    #[test]
    fn test_route() {
        let registry = FilterRegistry::new();
        let table = Table::new(
            headers(&["SQUAD", "status_ads", "roas_ads_l30d"]),
            vec![
                vec!["AREA 2".into(), "ACTIVE".into(), CellValue::Float(2.5)],
                vec!["INBOUND".into(), "PAUSED".into(), "0.4".into()],
                vec!["AREA 2".into(), "PAUSED".into(), CellValue::Null],
            ],
        );
        let routes = registry.route(&table);
        assert_eq!(routes.len(), registry.len());
        let rows_for = |key: &str| {
            routes
                .iter()
                .find(|(def, _)| def.key == key)
                .map(|(_, rows)| rows.clone())
                .unwrap()
        };
        assert_eq!(rows_for("kevin_squad"), vec![0, 2]);
        assert_eq!(rows_for("squad_inbound"), vec![1]);
        assert_eq!(rows_for("paused_campaigns"), vec![1, 2]);
        assert_eq!(rows_for("high_performers"), vec![0]);
        assert_eq!(rows_for("low_performers"), vec![1]);
        assert!(rows_for("dm_active").is_empty());
    }
}
