use serde::Serialize;

/// Host block of a listing card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostInfo {
    pub name: String,
    pub picture_url: String,
    pub is_superhost: bool,
}

/// Typed view of one heterogeneous listing record, produced once by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub amenities: Vec<String>,
    pub host: HostInfo,
    pub thumbnail_url: String,
}

impl Listing {
    /// Lowercased text the search filter matches against.
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.description,
            self.amenities.join(" "),
            self.host.name
        )
        .to_lowercase()
    }
}
