//! Party columns discovered while scraping.
//!
//! Which parties appear is not known until every municipality has been seen,
//! and a party can be missing from some municipalities. [`PartyVoteTable`]
//! keeps one vote sequence per party, index-aligned with the municipalities
//! in processing order: after `n` calls to [`PartyVoteTable::record_entity`]
//! every sequence holds exactly `n` slots, empty where the party got no value.
//!
//! Column order is the order in which parties were first seen, kept as an
//! explicit list next to the map.

use crate::error::{Result, ScrapeError};
use crate::models::PartyVotes;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Ordered party columns with one vote slot per processed entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyVoteTable {
    order: Vec<String>,
    votes: HashMap<String, Vec<String>>,
    processed: usize,
}

impl PartyVoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one entity's pairs into the table.
    ///
    /// - a party seen for the first time becomes a new column, back-filled
    ///   with empty slots for every entity already processed
    /// - a party listed twice for the same entity keeps its first value
    /// - every column without a value for this entity gets an empty slot
    pub fn record_entity(&mut self, pairs: &[PartyVotes]) {
        let slot = self.processed;

        for pair in pairs {
            let column = self.votes.entry(pair.party.clone()).or_insert_with(|| {
                debug!(party = %pair.party, entity_index = slot, "Discovered party column");
                self.order.push(pair.party.clone());
                vec![String::new(); slot]
            });

            if column.len() > slot {
                warn!(
                    party = %pair.party,
                    entity_index = slot,
                    kept = %column[slot],
                    ignored = %pair.votes,
                    "Party listed twice for one municipality; keeping the first value"
                );
                continue;
            }
            column.push(pair.votes.clone());
        }

        for column in self.votes.values_mut() {
            if column.len() == slot {
                column.push(String::new());
            }
        }
        self.processed += 1;
    }

    /// Number of entities folded in so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Party names in first-seen order.
    pub fn parties(&self) -> &[String] {
        &self.order
    }

    /// Vote sequence of one party.
    pub fn votes(&self, party: &str) -> Option<&[String]> {
        self.votes.get(party).map(Vec::as_slice)
    }

    /// Votes of `party` for the entity at `index`, empty when absent.
    pub fn get(&self, party: &str, index: usize) -> &str {
        self.votes
            .get(party)
            .and_then(|column| column.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Verify every column has exactly one slot per processed entity.
    pub fn check_alignment(&self) -> Result<()> {
        if self.order.len() != self.votes.len() {
            return Err(ScrapeError::ConsistencyFailure(format!(
                "{} ordered party names but {} vote columns",
                self.order.len(),
                self.votes.len()
            )));
        }
        for party in &self.order {
            let len = self.votes.get(party).map_or(0, Vec::len);
            if len != self.processed {
                return Err(ScrapeError::ConsistencyFailure(format!(
                    "party `{}` has {} vote slots after {} municipalities",
                    party, len, self.processed
                )));
            }
        }
        Ok(())
    }
}
