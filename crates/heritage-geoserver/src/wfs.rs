//! WFS `GetFeature` helpers for the `kr_admin1` province layer.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

/// Province boundary feature type, relative to the workspace.
pub const ADMIN1_LAYER: &str = "kr_admin1";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
}

/// Escapes a value for use inside a single-quoted CQL string literal.
#[must_use]
pub fn escape_cql_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Query pairs for a GeoJSON `GetFeature` on `<workspace>:<layer>`.
pub(crate) fn get_feature_params(workspace: &str, layer: &str) -> Vec<(&'static str, String)> {
    vec![
        ("service", "WFS".to_string()),
        ("version", "1.1.0".to_string()),
        ("request", "GetFeature".to_string()),
        ("typeName", format!("{workspace}:{layer}")),
    ]
}

/// Distinct `properties.name` values of a GeoJSON feature collection,
/// sorted. Missing, null, and empty names are skipped; numbers are kept in
/// their textual form.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if `body` is not a feature collection.
pub fn distinct_feature_names(body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let collection: FeatureCollection = serde_json::from_slice(body)?;
    let names: BTreeSet<String> = collection
        .features
        .into_iter()
        .filter_map(|f| f.properties?.remove("name"))
        .filter_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    Ok(names.into_iter().collect())
}
