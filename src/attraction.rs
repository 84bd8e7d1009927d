use serde::{Deserialize, Serialize};

// Data structures for the content service's attraction records.
//
// The service omits optional fields instead of sending nulls, so every field
// defaults: an absent field deserializes to an empty value rather than
// failing the whole record.

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAttraction {
    pub uuid: String,
    pub name: String,
    pub description: String,
    pub rating: Option<f64>,
    pub images: Vec<RawImage>,
    pub tags: Vec<String>,
    pub body: String,
    pub address: RawAddress,
    pub contact: RawContact,
    pub official_email: String,
    pub official_website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawImage {
    pub uuid: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAddress {
    pub building_name: String,
    pub street_name: String,
    pub floor_number: String,
    pub unit_number: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawContact {
    pub primary_contact_no: String,
}

// Both endpoints wrap their payload in a `data` member: the category listing
// carries a list of names, the search endpoint a list of attraction records.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: T,
}
