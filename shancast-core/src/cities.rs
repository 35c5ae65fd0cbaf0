use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Maximum number of suggestions returned for one query.
pub const SUGGESTION_LIMIT: usize = 10;

const BUNDLED_CITIES: &str = include_str!("../data/cities.json");

/// Static, load-once list of city names used for search suggestions.
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    names: Vec<String>,
}

// Records may carry country/coordinates too; only the name is used.
#[derive(Debug, Deserialize)]
struct CityRecord {
    name: String,
}

impl CityIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    /// Parse a JSON array of `{ "name": ... }` records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CityRecord> =
            serde_json::from_str(json).context("Failed to parse city index JSON")?;
        Ok(Self::new(records.into_iter().map(|r| r.name)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read city index: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid city index: {}", path.display()))
    }

    /// The index shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CITIES)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Up to [`SUGGESTION_LIMIT`] names containing `query`, case-insensitively,
    /// in index order. An empty query suggests nothing.
    pub fn suggest(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.names
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .take(SUGGESTION_LIMIT)
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_is_case_insensitive_and_ordered() {
        let index = CityIndex::new(["Paris", "London", "Derry", "London, Ontario", "Lyon"]);
        assert_eq!(index.suggest("lon"), vec!["London", "London, Ontario"]);
        assert_eq!(index.suggest("ON"), vec!["London", "London, Ontario", "Lyon"]);
    }

    #[test]
    fn matches_anywhere_in_the_name() {
        let index = CityIndex::new(["New York", "York", "Yorktown"]);
        assert_eq!(index.suggest("york"), vec!["New York", "York", "Yorktown"]);
    }

    #[test]
    fn caps_results() {
        let index = CityIndex::new((0..25).map(|i| format!("Springfield {i}")));
        let hits = index.suggest("spring");
        assert_eq!(hits.len(), SUGGESTION_LIMIT);
        assert_eq!(hits[0], "Springfield 0");
        assert_eq!(hits[9], "Springfield 9");
    }

    #[test]
    fn empty_query_suggests_nothing() {
        let index = CityIndex::new(["London"]);
        assert!(index.suggest("").is_empty());
        assert!(index.suggest("   ").is_empty());
    }

    #[test]
    fn bundled_index_loads() {
        let index = CityIndex::bundled().expect("bundled index is valid");
        assert!(!index.is_empty());
        assert_eq!(
            index.suggest("lon"),
            vec!["London", "Barcelona", "London, Ontario", "Londonderry"]
        );
    }

    #[test]
    fn from_json_ignores_extra_fields() {
        let index = CityIndex::from_json(r#"[{"name":"Oslo","country":"NO","lat":"59.9"}]"#)
            .expect("valid json");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn from_json_rejects_non_array() {
        assert!(CityIndex::from_json(r#"{"name":"Oslo"}"#).is_err());
    }
}
