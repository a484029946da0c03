use thiserror::Error;

/// Terminal startup failures. Each one ends the load pipeline and is shown as the
/// inline error panel.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("None of these paths worked: {}", .candidates.join(", "))]
    Unresolved { candidates: Vec<String> },

    #[error("Failed to load {url}: {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Could not parse {url} as JSON: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No listings found in {url}. Add a \"listings\": [] array to your {file}.")]
    Empty { url: String, file: String },

    #[error("Invalid data source location {location}: {reason}")]
    BadLocation { location: String, reason: String },
}
