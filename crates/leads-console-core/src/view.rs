//! Derived lead view: filtering and ordering.
//!
//! [`derive_view`] is a pure function of the lead collection and the
//! [`LeadFilters`]. The pipeline is:
//!
//! 1. Keep leads whose name or company contains `search` (case-insensitive).
//! 2. Keep leads whose status is in `statuses` (if non-empty).
//! 3. Keep leads whose source is in `sources` (if non-empty).
//! 4. Stable sort by `sort_by`: numeric for score, locale-aware collation
//!    for name and company.
//! 5. For `desc`, the ascending comparison is negated. Ties keep their
//!    collection order in both directions.
//!
//! [`ViewCache`] memoizes the result on its two inputs.

use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};

use crate::models::{Lead, LeadFilters, SortBy, SortOrder};

static COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    match Collator::try_new(Default::default(), CollatorOptions::default()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("collator unavailable, falling back to case-folded ordering: {}", e);
            None
        }
    }
});

/// Compare two strings the way a person reading a list would expect:
/// accents and case are secondary to the base letters, so `"Álvaro"` sorts
/// next to `"Alvaro"` rather than after `"Zed"`.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    match COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b),
        None => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

fn compare_by(a: &Lead, b: &Lead, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Score => a.score.cmp(&b.score),
        SortBy::Name => locale_compare(&a.name, &b.name),
        SortBy::Company => locale_compare(&a.company, &b.company),
    }
}

fn matches(lead: &Lead, filters: &LeadFilters, search: Option<&str>) -> bool {
    if let Some(term) = search {
        if !lead.name.to_lowercase().contains(term) && !lead.company.to_lowercase().contains(term)
        {
            return false;
        }
    }
    if !filters.statuses.is_empty() && !filters.statuses.contains(&lead.status) {
        return false;
    }
    if !filters.sources.is_empty() && !filters.sources.contains(&lead.source) {
        return false;
    }
    true
}

/// Apply `filters` to `leads` and return the ordered result.
pub fn derive_view(leads: &[Lead], filters: &LeadFilters) -> Vec<Lead> {
    let search = filters.search.to_lowercase();
    let search = (!search.is_empty()).then_some(search.as_str());

    let mut view: Vec<Lead> = leads
        .iter()
        .filter(|lead| matches(lead, filters, search))
        .cloned()
        .collect();

    // `sort_by` is stable; negating keeps equal elements in input order.
    view.sort_by(|a, b| {
        let ord = compare_by(a, b, filters.sort_by);
        match filters.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    view
}

/// Memoized [`derive_view`].
///
/// Recomputes only when the leads or the filters differ from the last call.
#[derive(Debug, Default)]
pub struct ViewCache {
    inputs: Option<(Vec<Lead>, LeadFilters)>,
    view: Vec<Lead>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, leads: &[Lead], filters: &LeadFilters) -> &[Lead] {
        let fresh = matches!(
            &self.inputs,
            Some((cached_leads, cached_filters))
                if cached_leads.as_slice() == leads && cached_filters == filters
        );
        if !fresh {
            self.view = derive_view(leads, filters);
            self.inputs = Some((leads.to_vec(), filters.clone()));
        }
        &self.view
    }
}
