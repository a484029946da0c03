//! Listing cards, the listings container and the page around it.

use std::collections::BTreeMap;

use askama::Template;

use crate::types::Listing;

pub const MAX_BADGES: usize = 6;
pub const NO_PRICE: &str = "—";

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    listing: &'a Listing,
    favorite: bool,
    badges: &'a [String],
    price: String,
}

#[derive(Template)]
#[template(path = "error_panel.html")]
struct ErrorPanelTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    listings_html: &'a str,
    query: &'a str,
    search_input: bool,
}

/// `$` plus an en-US grouped decimal with at most three fraction digits.
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::from("$");
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn price_text(price: Option<f64>) -> String {
    price.map(format_price).unwrap_or_else(|| NO_PRICE.to_string())
}

pub fn card(listing: &Listing, favorite: bool) -> askama::Result<String> {
    let shown = listing.amenities.len().min(MAX_BADGES);
    CardTemplate {
        listing,
        favorite,
        badges: &listing.amenities[..shown],
        price: price_text(listing.price),
    }
    .render()
}

pub fn cards<'a>(
    listings: impl IntoIterator<Item = &'a Listing>,
    is_favorite: impl Fn(&str) -> bool,
) -> askama::Result<String> {
    let mut html = String::new();
    for l in listings {
        html.push_str(&card(l, is_favorite(&l.id))?);
    }
    Ok(html)
}

pub fn error_panel(message: &str) -> askama::Result<String> {
    ErrorPanelTemplate { message }.render()
}

/// The `#listings` element: the mounted cards and the favorite toggles bound to them.
#[derive(Debug, Clone, Default)]
pub struct Container {
    html: String,
    listings: Vec<Listing>,
    toggles: BTreeMap<String, bool>,
}

impl Container {
    pub fn new() -> Self { Self::default() }

    /// Replace the whole content and rebind one toggle per listing id.
    pub fn mount(&mut self, listings: Vec<Listing>, is_favorite: impl Fn(&str) -> bool) -> askama::Result<()> {
        let toggles: BTreeMap<String, bool> = listings
            .iter()
            .map(|l| (l.id.clone(), is_favorite(&l.id)))
            .collect();
        let html = cards(&listings, |id| toggles.get(id).copied().unwrap_or(false))?;
        self.html = html;
        self.listings = listings;
        self.toggles = toggles;
        Ok(())
    }

    pub fn mount_error(&mut self, message: &str) -> askama::Result<()> {
        self.html = error_panel(message)?;
        self.listings.clear();
        self.toggles.clear();
        Ok(())
    }

    pub fn html(&self) -> &str { &self.html }

    pub fn is_bound(&self, id: &str) -> bool { self.toggles.contains_key(id) }

    pub fn bound(&self) -> impl Iterator<Item = &str> { self.toggles.keys().map(String::as_str) }

    /// Active state of the control for `id`, if one is mounted.
    pub fn is_active(&self, id: &str) -> Option<bool> { self.toggles.get(id).copied() }

    /// Flip the `active` state of the control for `id` on the mounted cards.
    /// Returns `false` when no control for `id` is bound.
    pub fn flip_toggle(&mut self, id: &str) -> askama::Result<bool> {
        let Some(active) = self.toggles.get(id).map(|a| !a) else {
            return Ok(false);
        };
        let toggles = &self.toggles;
        let html = cards(&self.listings, |other| {
            if other == id { active } else { toggles.get(other).copied().unwrap_or(false) }
        })?;
        self.html = html;
        self.toggles.insert(id.to_string(), active);
        Ok(true)
    }
}

/// Full HTML document around the container.
pub fn page(container: &Container, query: &str, search_input: bool) -> askama::Result<String> {
    PageTemplate { listings_html: container.html(), query, search_input }.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HostInfo;

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: "Loft <b>".to_string(),
            description: "Bright".to_string(),
            price: Some(1234.5),
            amenities: (1..=8).map(|i| format!("A{i}")).collect(),
            host: HostInfo { name: "Ana".to_string(), picture_url: "h.png".to_string(), is_superhost: true },
            thumbnail_url: "t.png".to_string(),
        }
    }

    #[test]
    fn prices_are_grouped() {
        assert_eq!(format_price(1234.5), "$1,234.5");
        assert_eq!(format_price(42.0), "$42");
        assert_eq!(format_price(1_000_000.0), "$1,000,000");
        assert_eq!(format_price(0.1234), "$0.123");
        assert_eq!(price_text(None), "—");
    }

    #[test]
    fn card_contents() {
        let html = card(&listing("7"), true).unwrap();
        assert!(html.contains("Loft &lt;b&gt;"));
        assert!(!html.contains("Loft <b>"));
        assert!(html.contains("data-fav=\"7\" class=\"btn btn-sm btn-light fav active\""));
        assert!(html.contains("A6</span>"));
        assert!(!html.contains("A7</span>"));
        assert!(html.contains("Ana ⭐"));
        assert!(html.contains("Superhost"));
        assert!(html.contains("<strong>$1,234.5</strong>"));
    }

    #[test]
    fn plain_host_has_no_star() {
        let mut l = listing("1");
        l.host.is_superhost = false;
        l.price = None;
        let html = card(&l, false).unwrap();
        assert!(!html.contains("⭐"));
        assert!(!html.contains("Superhost"));
        assert!(html.contains("class=\"btn btn-sm btn-light fav\""));
        assert!(html.contains("<strong>—</strong>"));
    }

    #[test]
    fn mount_replaces_content_and_bindings() {
        let mut c = Container::new();
        c.mount(vec![listing("a"), listing("b")], |id| id == "b").unwrap();
        assert_eq!(c.is_active("a"), Some(false));
        assert_eq!(c.is_active("b"), Some(true));
        assert!(c.html().contains("data-fav=\"b\" class=\"btn btn-sm btn-light fav active\""));

        c.mount(vec![listing("a")], |_| false).unwrap();
        assert!(c.is_bound("a"));
        assert!(!c.is_bound("b"));
        assert_eq!(c.is_active("b"), None);
        assert!(!c.html().contains("data-fav=\"b\""));
    }

    #[test]
    fn flip_updates_only_that_control() {
        let mut c = Container::new();
        c.mount(vec![listing("a"), listing("ab")], |_| false).unwrap();

        assert!(c.flip_toggle("a").unwrap());
        assert_eq!(c.is_active("a"), Some(true));
        assert_eq!(c.is_active("ab"), Some(false));
        assert!(c.html().contains("data-fav=\"a\" class=\"btn btn-sm btn-light fav active\""));
        assert!(c.html().contains("data-fav=\"ab\" class=\"btn btn-sm btn-light fav\""));

        assert!(c.flip_toggle("a").unwrap());
        assert_eq!(c.is_active("a"), Some(false));
        assert!(!c.flip_toggle("zzz").unwrap());
    }

    #[test]
    fn error_panel_is_escaped_and_unbound() {
        let mut c = Container::new();
        c.mount(vec![listing("a")], |_| false).unwrap();
        c.mount_error("Failed to load <x>: 500").unwrap();
        assert!(c.html().contains("alert-danger"));
        assert!(c.html().contains("Failed to load &lt;x&gt;: 500"));
        assert_eq!(c.bound().count(), 0);
    }

    #[test]
    fn page_wraps_container() {
        let mut c = Container::new();
        c.mount_error("boom").unwrap();
        let doc = page(&c, "be\"ach", true).unwrap();
        assert!(doc.contains("<div id=\"listings\" class=\"row\">"));
        assert!(doc.contains("alert-danger"));
        assert!(doc.contains("type=\"search\""));
        assert!(doc.contains("value=\"be&quot;ach\""));
        assert!(!page(&c, "", false).unwrap().contains("type=\"search\""));
    }
}
