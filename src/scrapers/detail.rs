//! Municipality detail page: turnout counters and party votes.
//!
//! One fetch per municipality feeds both extractions; the parsed document is
//! shared between [`parse_turnout`] and [`parse_party_votes`].

use crate::error::{Result, ScrapeError};
use crate::extract::{FieldSelector, strip_separators};
use crate::fetcher::PageFetcher;
use crate::locator::Locator;
use crate::models::{Entity, EntityPage, PartyVotes, TurnoutRecord};
use crate::scrapers::static_selector;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::Html;
use tracing::{debug, instrument, warn};

static VOTERS: Lazy<FieldSelector> = Lazy::new(|| static_selector("td", "cislo", Some("sa2")));
static ENVELOPES: Lazy<FieldSelector> = Lazy::new(|| static_selector("td", "cislo", Some("sa3")));
static VALID_VOTES: Lazy<FieldSelector> = Lazy::new(|| static_selector("td", "cislo", Some("sa6")));

/// One of the two tables the party list is split across.
struct PartyGroup {
    label: &'static str,
    names: FieldSelector,
    votes: FieldSelector,
}

static PARTY_GROUPS: Lazy<[PartyGroup; 2]> = Lazy::new(|| {
    ["t1", "t2"].map(|label| PartyGroup {
        label,
        names: static_selector("td", "overflow_name", Some(format!("{label}sa1 {label}sb2").as_str())),
        votes: static_selector("td", "cislo", Some(format!("{label}sa2 {label}sb3").as_str())),
    })
});

/// Fetch one municipality's detail page and extract everything from it.
///
/// # Arguments
///
/// * `fetcher` - Where the page comes from
/// * `locator` - Builds the detail-page URL from the municipality code
/// * `entity` - The municipality to fetch
///
/// # Returns
///
/// Its turnout counters and `(party, votes)` pairs in page order.
///
/// # Errors
///
/// - [`ScrapeError::PageUnavailable`] if the fetch fails
/// - [`ScrapeError::RecordFieldMissing`] if a turnout field is absent or a
///   party group has unequal name and vote counts
#[instrument(level = "info", skip_all, fields(entity_id = %entity.id))]
pub async fn fetch_entity_page<F: PageFetcher>(
    fetcher: &F,
    locator: &Locator,
    entity: &Entity,
) -> Result<EntityPage> {
    let url = locator.detail_url(&entity.id)?;
    let html = fetcher.fetch(&url).await?;
    let page = parse_entity_page(&entity.id, &html).inspect_err(|e| {
        debug!(error = %e, preview = %truncate_for_log(&html, 300), "Detail page did not parse");
    })?;
    debug!(
        name = %entity.name,
        parties = page.parties.len(),
        "Parsed municipality detail page"
    );
    Ok(page)
}

/// Parse detail-page markup.
pub fn parse_entity_page(entity_id: &str, html: &str) -> Result<EntityPage> {
    let document = Html::parse_document(html);
    let turnout = parse_turnout(entity_id, &document)?;
    let parties = parse_party_votes(entity_id, &document)?;
    Ok(EntityPage { turnout, parties })
}

/// Extract registered voters, issued envelopes and valid votes.
pub fn parse_turnout(entity_id: &str, document: &Html) -> Result<TurnoutRecord> {
    let field = |selector: &FieldSelector, name: &str| {
        selector
            .first(document)
            .map(|text| strip_separators(&text))
            .ok_or_else(|| ScrapeError::RecordFieldMissing {
                entity_id: entity_id.to_string(),
                field: name.to_string(),
            })
    };

    Ok(TurnoutRecord {
        entity_id: entity_id.to_string(),
        voters: field(&VOTERS, "voters")?,
        envelopes: field(&ENVELOPES, "issued envelopes")?,
        valid_votes: field(&VALID_VOTES, "valid votes")?,
    })
}

/// Extract `(party, votes)` pairs from both party groups.
///
/// Names and counts are paired by index within a group, never across groups.
/// A page without party tables yields an empty list.
pub fn parse_party_votes(entity_id: &str, document: &Html) -> Result<Vec<PartyVotes>> {
    let mut pairs = Vec::new();
    for group in PARTY_GROUPS.iter() {
        let names: Vec<String> = group.names.texts(document).collect();
        let votes: Vec<String> = group.votes.texts(document).collect();

        if names.len() != votes.len() {
            warn!(
                entity_id,
                group = group.label,
                names = names.len(),
                votes = votes.len(),
                "Party names and vote counts do not line up"
            );
            return Err(ScrapeError::RecordFieldMissing {
                entity_id: entity_id.to_string(),
                field: format!("party votes (group {})", group.label),
            });
        }

        pairs.extend(
            names
                .into_iter()
                .zip(votes)
                .map(|(party, votes)| PartyVotes::new(party, strip_separators(&votes))),
        );
    }
    Ok(pairs)
}
