use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single row of the player master table. The empty string marks a
/// missing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub current_team: String,
}

impl PlayerRecord {
    /// Count of non-empty core fields, used to rank duplicate candidates.
    pub fn completeness(&self) -> usize {
        [
            &self.name,
            &self.nationality,
            &self.date_of_birth,
            &self.current_team,
        ]
        .iter()
        .filter(|v| !v.is_empty())
        .count()
    }

    pub fn has_team(&self) -> bool {
        !self.current_team.is_empty()
    }
}

/// A single scouting report referencing a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub report_id: String,
    pub player_id: String,
    pub player_name: String,
    pub nationality: String,
    pub scout_id: String,
    pub country: String,
    pub report_type: String,
    pub performance_grade: String,
    pub potential_grade: String,
    pub primary_position: String,
    pub secondary_position: String,
    pub foot: String,
    pub created_on: String,
    pub modified_on: String,
    pub match_date: String,
}

/// Player identifiers are a fixed prefix followed by uppercase
/// alphanumerics; `_` is also admitted so reissued identifiers
/// (`PLY_9_01`) satisfy the same check.
pub fn is_valid_player_id(id: &str) -> bool {
    match id.strip_prefix("PLY_") {
        Some(rest) => {
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Identifier mapping
// ---------------------------------------------------------------------------

/// Old identifier → canonical identifier, accumulated over a pipeline run.
///
/// Keys are never overwritten once set: the first mapping recorded for an
/// old identifier wins.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct IdMapping(BTreeMap<String, String>);

impl IdMapping {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record `old → new` unless `old` is already mapped. Returns whether
    /// the entry was inserted.
    pub fn record(&mut self, old: &str, new: &str) -> bool {
        if self.0.contains_key(old) {
            return false;
        }
        self.0.insert(old.to_string(), new.to_string());
        true
    }

    /// Canonical identifier for `id`, or `id` itself when unmapped.
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.0.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Follow `old → … → live` value chains to their end. A record can be
    /// reissued an identifier in one resolver pass and merged away in the
    /// next, so a value may itself be a mapped key; after compression every
    /// value names an identifier of the final table. The walk is bounded by
    /// the map size.
    pub fn compress(&mut self) {
        let keys: Vec<String> = self.0.keys().cloned().collect();
        for key in keys {
            let mut target = self.0[&key].clone();
            let mut hops = 0;
            while let Some(next) = self.0.get(&target) {
                if *next == target || hops > self.0.len() {
                    break;
                }
                target = next.clone();
                hops += 1;
            }
            self.0.insert(key, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_pattern() {
        assert!(is_valid_player_id("PLY_1"));
        assert!(is_valid_player_id("PLY_A7K2"));
        assert!(is_valid_player_id("PLY_9_01"));
        assert!(!is_valid_player_id(""));
        assert!(!is_valid_player_id("PLY_"));
        assert!(!is_valid_player_id("ply_1"));
        assert!(!is_valid_player_id("PLY_a1"));
        assert!(!is_valid_player_id("X_123"));
    }

    #[test]
    fn mapping_first_wins() {
        let mut m = IdMapping::new();
        assert!(m.record("PLY_2", "PLY_1"));
        assert!(!m.record("PLY_2", "PLY_9"));
        assert_eq!(m.resolve("PLY_2"), "PLY_1");
        assert_eq!(m.resolve("PLY_7"), "PLY_7");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn mapping_compress_follows_chains() {
        let mut m = IdMapping::new();
        m.record("PLY_9", "PLY_9_01");
        m.record("PLY_9_01", "PLY_7");
        m.compress();
        assert_eq!(m.resolve("PLY_9"), "PLY_7");
        assert_eq!(m.resolve("PLY_9_01"), "PLY_7");
    }

    #[test]
    fn completeness_counts_non_empty_core_fields() {
        let p = PlayerRecord {
            id: "PLY_1".into(),
            name: "John Smith".into(),
            date_of_birth: String::new(),
            nationality: "England".into(),
            current_team: String::new(),
        };
        assert_eq!(p.completeness(), 2);
        assert!(!p.has_team());
    }
}
