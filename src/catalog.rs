use serde_json::Value;

use crate::extract::listing_from_record;
use crate::types::Listing;

/// Hard cap on listings held in the catalog and in any filtered view.
pub const MAX_LISTINGS: usize = 50;

/// Listings loaded for the session. Immutable once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    source: String,
    listings: Vec<Listing>,
    haystacks: Vec<String>,
}

impl Catalog {
    /// Keeps the first `MAX_LISTINGS` records in order and normalizes each once.
    /// The raw records are dropped afterwards.
    pub fn from_records(source: impl Into<String>, records: Vec<Value>) -> Self {
        let listings: Vec<Listing> = records
            .iter()
            .take(MAX_LISTINGS)
            .enumerate()
            .map(|(idx, r)| listing_from_record(r, idx))
            .collect();
        let haystacks = listings.iter().map(Listing::haystack).collect();
        Self { source: source.into(), listings, haystacks }
    }

    /// URL the catalog was loaded from.
    pub fn source(&self) -> &str { &self.source }

    pub fn len(&self) -> usize { self.listings.len() }

    pub fn is_empty(&self) -> bool { self.listings.is_empty() }

    pub fn listings(&self) -> &[Listing] { &self.listings }

    pub fn get(&self, index: usize) -> Option<&Listing> { self.listings.get(index) }

    pub(crate) fn haystack(&self, index: usize) -> &str { &self.haystacks[index] }
}

/// Ordered positions into a [`Catalog`], capped at `MAX_LISTINGS`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilteredView {
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn all(catalog: &Catalog) -> Self {
        Self::from_indices(0..catalog.len())
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self { indices: indices.into_iter().take(MAX_LISTINGS).collect() }
    }

    pub fn indices(&self) -> &[usize] { &self.indices }

    pub fn len(&self) -> usize { self.indices.len() }

    pub fn is_empty(&self) -> bool { self.indices.is_empty() }

    pub fn listings<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Listing> + 'a {
        self.indices.iter().filter_map(move |&i| catalog.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncates_to_cap_preserving_order() {
        let records: Vec<Value> = (0..120).map(|i| json!({ "id": i, "name": format!("L{i}") })).collect();
        let catalog = Catalog::from_records("mem://x", records);
        assert_eq!(catalog.len(), 50);
        let ids: Vec<&str> = catalog.listings().iter().map(|l| l.id.as_str()).collect();
        let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn synthetic_ids_use_catalog_position() {
        let catalog = Catalog::from_records("mem://x", vec![json!({ "name": "A" }), json!({ "name": "B" })]);
        assert_eq!(catalog.get(1).unwrap().id, "1-B");
    }

    #[test]
    fn view_caps_and_resolves() {
        let catalog = Catalog::from_records("mem://x", vec![json!({ "name": "A" }), json!({ "name": "B" })]);
        let view = FilteredView::from_indices(vec![1]);
        let titles: Vec<&str> = view.listings(&catalog).map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["B"]);
        assert_eq!(FilteredView::from_indices(0..500).len(), MAX_LISTINGS);
    }
}
