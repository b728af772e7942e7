//! Data models for scraped entities and the assembled result table.
//!
//! - [`Entity`]: one municipality as listed on the district index page
//! - [`TurnoutRecord`]: the fixed per-entity counters
//! - [`PartyVotes`]: one `(party, votes)` pair from a detail page
//! - [`EntityPage`]: everything parsed from one detail page
//! - [`ResultRow`] / [`ResultTable`]: the merged output handed to a sink
//!
//! Numeric values are kept as text. The site formats them with thousands
//! separators; these are stripped but the digits are otherwise left exactly as
//! published.

use serde::{Deserialize, Serialize};

/// Column headers that precede the discovered party columns.
pub const FIXED_HEADERS: [&str; 5] = ["Obec", "ID obce", "Voliči", "Vydané obálky", "Platné hlasy"];

/// A municipality listed on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Municipality code, used to build the detail-page URL.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Turnout counters of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoutRecord {
    pub entity_id: String,
    /// Registered voters.
    pub voters: String,
    /// Issued envelopes.
    pub envelopes: String,
    /// Valid votes.
    pub valid_votes: String,
}

impl TurnoutRecord {
    /// Empty counters for an entity whose page could not be scraped.
    pub fn blank(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            ..Self::default()
        }
    }
}

/// A party and the votes it received in one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyVotes {
    pub party: String,
    pub votes: String,
}

impl PartyVotes {
    pub fn new(party: impl Into<String>, votes: impl Into<String>) -> Self {
        Self {
            party: party.into(),
            votes: votes.into(),
        }
    }
}

/// Everything extracted from one entity's detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPage {
    pub turnout: TurnoutRecord,
    /// Pairs in page order: first rendering group, then the second.
    pub parties: Vec<PartyVotes>,
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub name: String,
    pub id: String,
    pub voters: String,
    pub envelopes: String,
    pub valid_votes: String,
    /// One value per party column, in header order; empty when absent.
    pub votes: Vec<String>,
}

impl ResultRow {
    /// The row flattened into cells, in header order.
    pub fn cells(&self) -> Vec<&str> {
        let mut cells = vec![
            self.name.as_str(),
            self.id.as_str(),
            self.voters.as_str(),
            self.envelopes.as_str(),
            self.valid_votes.as_str(),
        ];
        cells.extend(self.votes.iter().map(String::as_str));
        cells
    }
}

/// The assembled table: headers plus one row per entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Number of party columns.
    pub fn party_count(&self) -> usize {
        self.headers.len().saturating_sub(FIXED_HEADERS.len())
    }

    /// Party column names, in first-seen order.
    pub fn parties(&self) -> &[String] {
        self.headers.get(FIXED_HEADERS.len()..).unwrap_or(&[])
    }
}
