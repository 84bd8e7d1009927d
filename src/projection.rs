use serde::Serialize;

use crate::attraction::{RawAddress, RawAttraction, RawImage};

// View-model projection: shapes a raw attraction record into a structure the
// presentation layer can render directly. Everything in this module is pure
// and total; absent source fields degrade to empty values, never to errors.

/// Display-ready form of one attraction. Built fresh on every fetch and
/// replaced wholesale by the next one; nothing mutates it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractionViewModel {
    pub uuid: String,
    pub name: String,
    pub rating_percent: Option<f64>,
    pub image: ImageRef,
    pub description: String,
    pub truncated_description: Option<String>,
    pub tags: Vec<String>,
    pub body_html: String,
    pub address_lines: Vec<String>,
    pub contact: String,
    pub official_email: String,
    pub official_website: String,
}

/// Which image source a record resolved to. A media id must be expanded
/// through the content service's media endpoint; a url is usable as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ImageRef {
    MediaId(String),
    Url(String),
    None,
}

impl ImageRef {
    /// Expands the reference into a fetchable URL, given the media endpoint
    /// base (`GetMediaByUuid` on the production service).
    pub fn display_url(&self, media_base: &str) -> Option<String> {
        match self {
            ImageRef::MediaId(id) => {
                Some(format!("{}?uuid={}&mediaType=image", media_base, id))
            }
            ImageRef::Url(url) => Some(url.clone()),
            ImageRef::None => None,
        }
    }
}

/// Orders the parts of an address into display lines: building name, street
/// name, unit token, postal line. Empty parts are dropped.
///
/// A non-empty floor number is folded together with the unit number into a
/// `#<floor>-<unit>` token; the raw floor/unit values are never emitted on
/// their own. Upstream records sometimes carry a floor with no unit, which
/// yields a bare `#3-` token.
pub fn format_address(address: &RawAddress) -> Vec<String> {
    let unit = if address.floor_number.is_empty() {
        String::new()
    } else {
        format!("#{}-{}", address.floor_number, address.unit_number)
    };
    let postal = if address.postal_code.is_empty() {
        String::new()
    } else {
        format!("Singapore {}", address.postal_code)
    };

    [&address.building_name, &address.street_name, &unit, &postal]
        .into_iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect()
}

/// Converts a 0-5 rating into the 0-100 percentage the rating bar renders.
/// Absence propagates; out-of-range values pass through unclamped, since
/// they are an upstream data-quality concern rather than ours.
pub fn rating_percent(rating: Option<f64>) -> Option<f64> {
    rating.map(|r| r / 5.0 * 100.0)
}

/// Chooses between a media id and a direct url with fixed precedence: a
/// non-empty media id wins, then a url, then nothing. Total by construction.
pub fn resolve_image(media_id: Option<&str>, url: Option<&str>) -> ImageRef {
    match media_id {
        Some(id) if !id.is_empty() => ImageRef::MediaId(id.to_string()),
        _ => match url {
            Some(url) => ImageRef::Url(url.to_string()),
            None => ImageRef::None,
        },
    }
}

// A record's first image is the one shown; empty strings in it stand for
// fields the service omitted.
fn first_image(images: &[RawImage]) -> ImageRef {
    match images.first() {
        Some(image) => resolve_image(
            Some(image.uuid.as_str()),
            (!image.url.is_empty()).then_some(image.url.as_str()),
        ),
        None => ImageRef::None,
    }
}

/// Bounds a description to `max_words` whitespace-separated words, appending
/// `...` when anything was dropped. Spacing collapses to single spaces, so
/// re-truncating already-bounded text is a no-op.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    let mut truncated = words[..max_words].join(" ");
    truncated.push_str("...");
    truncated
}

/// Maps raw attraction records to view models. Configure a word limit to get
/// a bounded `truncated_description` for list and rail cards; detail views
/// project without one.
#[derive(Debug, Clone, Default)]
pub struct AttractionProjector {
    word_limit: Option<usize>,
}

impl AttractionProjector {
    pub fn new() -> Self {
        Self { word_limit: None }
    }

    pub fn with_word_limit(max_words: usize) -> Self {
        Self {
            word_limit: Some(max_words),
        }
    }

    /// Pure projection of one record. Deterministic for a given input and
    /// never fails, whatever the record is missing.
    pub fn project(&self, raw: &RawAttraction) -> AttractionViewModel {
        AttractionViewModel {
            uuid: raw.uuid.clone(),
            name: raw.name.clone(),
            rating_percent: rating_percent(raw.rating),
            image: first_image(&raw.images),
            description: raw.description.clone(),
            truncated_description: self
                .word_limit
                .map(|limit| truncate_words(&raw.description, limit)),
            tags: raw.tags.clone(),
            body_html: raw.body.clone(),
            address_lines: format_address(&raw.address),
            contact: raw.contact.primary_contact_no.clone(),
            official_email: raw.official_email.clone(),
            official_website: raw.official_website.clone(),
        }
    }
}
