//! Per-match records produced by the segment parser

use indexmap::IndexMap;
use serde::Serialize;

/// Kill tally of a single player within one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub name: String,
    /// Kills scored minus deaths caused by the environment. May be negative.
    pub kills: i64,
}

impl PlayerStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kills: 0,
        }
    }
}

/// Parsed result of one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// 1-based position of the match in the source log
    pub game: usize,
    pub total_kills: u64,
    /// Players in first-seen order
    pub players: IndexMap<String, PlayerStats>,
    /// Cause-of-death labels in first-seen order
    pub kills_by_means: IndexMap<String, u64>,
}

impl MatchRecord {
    pub fn new(game: usize) -> Self {
        Self {
            game,
            total_kills: 0,
            players: IndexMap::new(),
            kills_by_means: IndexMap::new(),
        }
    }

    pub fn player_kills(&self, name: &str) -> Option<i64> {
        self.players.get(name).map(|p| p.kills)
    }

    pub fn means_total(&self) -> u64 {
        self.kills_by_means.values().sum()
    }
}

/// Match records in ascending game order
///
/// The only way to build one from arbitrary records is
/// [`ResultSet::from_unordered`], which sorts, so the ordering holds no
/// matter how the records were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<MatchRecord>,
}

impl ResultSet {
    pub fn from_unordered(mut records: Vec<MatchRecord>) -> Self {
        records.sort_by_key(|record| record.game);
        Self { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_kills(&self) -> u64 {
        self.records.iter().map(|r| r.total_kills).sum()
    }

    pub fn into_records(self) -> Vec<MatchRecord> {
        self.records
    }
}

impl IntoIterator for ResultSet {
    type Item = MatchRecord;
    type IntoIter = std::vec::IntoIter<MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
