//! Page scrapers for the volby.cz result pages.
//!
//! Scraping follows the same two-phase pattern for every run:
//!
//! 1. **Indexing** ([`directory`]): read the district index page (`ps32`) and
//!    list its municipalities
//! 2. **Fetching** ([`detail`]): download each municipality's detail page
//!    (`ps311`) and extract turnout counters and party votes
//!
//! # Page Layout
//!
//! | Page | Cells | Selector |
//! |------|-------|----------|
//! | index | municipality code | `td.cislo` |
//! | index | municipality name | `td.overflow_name` |
//! | detail | registered voters | `td.cislo[headers="sa2"]` |
//! | detail | issued envelopes | `td.cislo[headers="sa3"]` |
//! | detail | valid votes | `td.cislo[headers="sa6"]` |
//! | detail | party name, group N | `td.overflow_name[headers="tNsa1 tNsb2"]` |
//! | detail | party votes, group N | `td.cislo[headers="tNsa2 tNsb3"]` |
//!
//! The detail page splits the party list across two tables (groups `t1` and
//! `t2`); names and counts are paired by position inside each group.

pub mod detail;
pub mod directory;

use crate::extract::FieldSelector;

/// Compile a selector from constant parts.
///
/// Only used for the static selectors in this module tree, whose CSS is fixed
/// at compile time.
pub(crate) fn static_selector(tag: &str, class: &str, headers: Option<&str>) -> FieldSelector {
    let builder = FieldSelector::new(tag).class(class);
    let builder = match headers {
        Some(h) => builder.attr("headers", h),
        None => builder,
    };
    builder.build().expect("static selector must compile")
}
