//! Request and record types for the KHS list/detail endpoints.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Parameters for the list endpoint (`SearchKindOpenapiList.do`).
///
/// Every field may be empty; the API then treats it as "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub kind_code: String,
    pub region_code: String,
    pub name: String,
    pub page_size: u32,
}

/// Key of one detail record (`SearchKindOpenapiDt.do`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailKey {
    pub kind_code: String,
    pub external_id: String,
    pub region_code: String,
}

/// One `<item>` of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    /// `ccbaAsno`
    pub external_id: String,
    /// `ccbaMnm1`
    pub title: String,
    /// `ccbaKdcd`
    pub kind_code: String,
    /// `ccbaCtcd`
    pub region_code: String,
}

/// A list item ranked against the user's query, pending detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub external_id: String,
    pub title: String,
    pub preliminary_name_score: u32,
    pub source_kind_code: String,
    pub source_region_code: String,
}

/// A detail response.
///
/// Optional fields are `None` when the element is missing or blank;
/// coordinates are `None` unless they parse to finite numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub title: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_office: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl DetailRecord {
    /// The record's position, when both coordinates are known.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.longitude?, self.latitude?))
    }
}

/// Input to [`crate::Resolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    /// Kind code of the clicked feature; empty falls back to each candidate's own.
    pub kind_code: String,
    /// Region code of the clicked feature; empty falls back to each candidate's own.
    pub region_code: String,
    /// Display name of the clicked feature.
    pub name: String,
    pub click: GeoPoint,
}

/// The winning detail and its combined score (name 0–100 plus distance 0–40).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub detail: DetailRecord,
    pub score: u32,
    pub external_id: String,
}
