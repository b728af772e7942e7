//! Merge entities, turnout counters and party columns into one table.

use crate::aggregate::PartyVoteTable;
use crate::error::{Result, ScrapeError};
use crate::extract::strip_separators;
use crate::models::{Entity, FIXED_HEADERS, ResultRow, ResultTable, TurnoutRecord};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Build the result table: row `i` is entity `i`, columns are the fixed
/// headers followed by the party columns in first-seen order.
///
/// # Arguments
///
/// * `entities` - Municipalities in index order
/// * `turnout` - Turnout counters keyed by municipality code
/// * `parties` - Party columns, one slot per municipality
///
/// # Errors
///
/// [`ScrapeError::ConsistencyFailure`] if the entity list, the turnout records
/// and the party columns do not all describe the same number of entities.
/// That can only happen if the fetch loop fell out of step with the entity
/// order, so it is never recovered from.
#[instrument(level = "debug", skip_all, fields(entities = entities.len()))]
pub fn assemble(
    entities: &[Entity],
    turnout: &HashMap<String, TurnoutRecord>,
    parties: &PartyVoteTable,
) -> Result<ResultTable> {
    check_cardinality(entities, turnout, parties)?;

    let mut headers: Vec<String> = FIXED_HEADERS.iter().map(|h| h.to_string()).collect();
    headers.extend(parties.parties().iter().cloned());

    let rows = entities
        .iter()
        .enumerate()
        .map(|(i, entity)| -> Result<ResultRow> {
            let record = turnout.get(&entity.id).ok_or_else(|| {
                ScrapeError::ConsistencyFailure(format!(
                    "no turnout record for municipality {}",
                    entity.id
                ))
            })?;
            Ok(ResultRow {
                name: entity.name.clone(),
                id: entity.id.clone(),
                voters: record.voters.clone(),
                envelopes: record.envelopes.clone(),
                valid_votes: record.valid_votes.clone(),
                votes: parties
                    .parties()
                    .iter()
                    .map(|party| strip_separators(parties.get(party, i)))
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(rows = rows.len(), columns = headers.len(), "Assembled result table");
    Ok(ResultTable { headers, rows })
}

fn check_cardinality(
    entities: &[Entity],
    turnout: &HashMap<String, TurnoutRecord>,
    parties: &PartyVoteTable,
) -> Result<()> {
    let expected = entities.len();
    if turnout.len() != expected {
        return Err(ScrapeError::ConsistencyFailure(format!(
            "{} turnout records for {} municipalities",
            turnout.len(),
            expected
        )));
    }
    if let Some(entity) = entities.iter().find(|e| !turnout.contains_key(&e.id)) {
        return Err(ScrapeError::ConsistencyFailure(format!(
            "no turnout record for municipality {}",
            entity.id
        )));
    }
    if parties.processed() != expected {
        return Err(ScrapeError::ConsistencyFailure(format!(
            "party columns cover {} municipalities, expected {}",
            parties.processed(),
            expected
        )));
    }
    parties.check_alignment()
}
