//! Field extraction over untyped listing records.
//!
//! Every logical field is described by an ordered lookup table. Extraction walks the
//! table and falls back to a fixed default, so it never fails.

use serde_json::Value;

use crate::types::{HostInfo, Listing};

pub const PLACEHOLDER_THUMBNAIL: &str = "https://placehold.co/600x400?text=No+Image";
pub const PLACEHOLDER_HOST_PICTURE: &str = "https://placehold.co/64x64?text=?";

pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description";
pub const UNKNOWN_HOST: &str = "Unknown host";

/// Which JSON shapes a lookup accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Any,
    /// Strings, numbers and booleans; arrays and objects are skipped.
    Scalar,
}

/// One entry of a fallback chain: a dot-separated path and the shape it must have.
#[derive(Debug, Clone, Copy)]
pub struct Lookup {
    pub path: &'static str,
    pub shape: Shape,
}

const fn any(path: &'static str) -> Lookup {
    Lookup { path, shape: Shape::Any }
}

const fn scalar(path: &'static str) -> Lookup {
    Lookup { path, shape: Shape::Scalar }
}

pub const ID: &[Lookup] = &[any("id"), any("listing_id"), any("_id")];
pub const TITLE: &[Lookup] = &[any("name"), any("listing_name"), any("title")];
pub const DESCRIPTION: &[Lookup] = &[any("description"), any("summary")];
// `price` may itself be an object carrying `rate`
pub const PRICE: &[Lookup] = &[scalar("price"), any("pricing.price"), any("price.rate")];
pub const AMENITIES: &[Lookup] = &[any("amenities")];
pub const HOST_NAME: &[Lookup] = &[any("host_name"), any("host.name")];
pub const HOST_PICTURE: &[Lookup] = &[any("host_picture_url"), any("host.picture_url")];
pub const SUPERHOST: &[Lookup] = &[any("host_is_superhost"), any("host.is_superhost")];
pub const THUMBNAIL: &[Lookup] = &[
    any("thumbnail_url"),
    any("picture_url"),
    any("images.picture_url"),
];

/// Walk `path` one segment at a time. A missing or null segment is a miss.
pub fn get_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = record;
    for seg in path.split('.') {
        cur = match cur.get(seg) {
            Some(v) if !v.is_null() => v,
            _ => return None,
        };
    }
    Some(cur)
}

/// First present, non-null top-level value among `keys`.
pub fn pick<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| record.get(*k).filter(|v| !v.is_null()))
}

/// First value matched by a lookup table.
pub fn lookup<'a>(record: &'a Value, table: &[Lookup]) -> Option<&'a Value> {
    table.iter().find_map(|l| {
        get_path(record, l.path).filter(|v| match l.shape {
            Shape::Any => true,
            Shape::Scalar => !(v.is_array() || v.is_object()),
        })
    })
}

/// Display text of a JSON value: strings verbatim, everything else as JSON.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_or(record: &Value, table: &[Lookup], fallback: &str) -> String {
    lookup(record, table)
        .map(text_of)
        .unwrap_or_else(|| fallback.to_string())
}

/// Numbers pass through; other values keep only digits and `.` before parsing.
pub fn parse_price(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        other => {
            let digits: String = text_of(other)
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            if digits.is_empty() {
                return None;
            }
            digits.parse::<f64>().ok()
        }
    }
}

/// Arrays pass through in order; strings split on `,` or `;`.
pub fn parse_amenities(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(text_of).collect(),
        Value::String(s) => s
            .split([',', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_truthy_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "t" | "true" | "yes" | "1"
        ),
        _ => false,
    }
}

pub fn title_for(record: &Value) -> String {
    text_or(record, TITLE, UNTITLED)
}

pub fn description_for(record: &Value) -> String {
    text_or(record, DESCRIPTION, NO_DESCRIPTION)
}

pub fn price_for(record: &Value) -> Option<f64> {
    lookup(record, PRICE).and_then(parse_price)
}

pub fn amenities_for(record: &Value) -> Vec<String> {
    lookup(record, AMENITIES)
        .map(parse_amenities)
        .unwrap_or_default()
}

pub fn host_name_for(record: &Value) -> String {
    text_or(record, HOST_NAME, UNKNOWN_HOST)
}

pub fn host_picture_for(record: &Value) -> String {
    text_or(record, HOST_PICTURE, PLACEHOLDER_HOST_PICTURE)
}

pub fn is_superhost(record: &Value) -> bool {
    lookup(record, SUPERHOST).is_some_and(is_truthy_flag)
}

pub fn thumbnail_for(record: &Value) -> String {
    text_or(record, THUMBNAIL, PLACEHOLDER_THUMBNAIL)
}

/// Explicit id when present, otherwise `"{index}-{title}"`. The synthetic form is
/// only stable while the record keeps its position in the catalog.
pub fn id_for(record: &Value, index: usize) -> String {
    match lookup(record, ID) {
        Some(v) => text_of(v),
        None => format!("{}-{}", index, title_for(record)),
    }
}

pub fn listing_from_record(record: &Value, index: usize) -> Listing {
    Listing {
        id: id_for(record, index),
        title: title_for(record),
        description: description_for(record),
        price: price_for(record),
        amenities: amenities_for(record),
        host: HostInfo {
            name: host_name_for(record),
            picture_url: host_picture_for(record),
            is_superhost: is_superhost(record),
        },
        thumbnail_url: thumbnail_for(record),
    }
}
