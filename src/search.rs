use crate::catalog::{Catalog, FilteredView};

/// Trim and lowercase raw input text.
pub fn normalize_query(q: &str) -> String {
    q.trim().to_lowercase()
}

/// Listings whose searchable text contains the query. An empty query keeps the
/// whole catalog.
pub fn filter(catalog: &Catalog, query: &str) -> FilteredView {
    let q = normalize_query(query);
    if q.is_empty() {
        return FilteredView::all(catalog);
    }
    FilteredView::from_indices((0..catalog.len()).filter(|&i| catalog.haystack(i).contains(&q)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_records(
            "mem://x",
            vec![
                json!({ "name": "Cozy Loft", "amenities": "Wifi; Kitchen" }),
                json!({ "name": "Beach House", "host": { "name": "Marta" } }),
            ],
        )
    }

    #[test]
    fn matches_title_case_insensitively() {
        let c = catalog();
        assert_eq!(filter(&c, "beach").indices(), &[1]);
        assert_eq!(filter(&c, "  BEACH ").indices(), &[1]);
    }

    #[test]
    fn empty_query_keeps_everything() {
        let c = catalog();
        assert_eq!(filter(&c, "").indices(), &[0, 1]);
        assert_eq!(filter(&c, "   ").len(), 2);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter(&catalog(), "castle").is_empty());
    }

    #[test]
    fn searches_amenities_host_and_fallback_description() {
        let c = catalog();
        assert_eq!(filter(&c, "kitchen").indices(), &[0]);
        assert_eq!(filter(&c, "marta").indices(), &[1]);
        assert_eq!(filter(&c, "no description").len(), 2);
    }
}
