//! Typed view over heritage feature attributes.
//!
//! Heritage tables and GeoServer features spell the same attribute several
//! ways (`국가유산명`, `ccbaMnm1`, `name`, ...). [`HeritageProperties`] picks the
//! first usable spelling for each field once, at the boundary, and keeps the
//! untouched attribute map alongside for display.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const NAME_KEYS: [&str; 3] = ["국가유산명", "ccbaMnm1", "name"];
const KIND_CODE_KEYS: [&str; 3] = ["종목코드", "ccbaKdcd", "kdcd"];
const SIDO_KEYS: [&str; 3] = ["시도명", "sido", "ccbaCtcdNm"];
const EXTERNAL_ID_KEYS: [&str; 2] = ["ccbaAsno", "asno"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageProperties {
    pub name: Option<String>,
    pub kind_code: Option<String>,
    pub sido_name: Option<String>,
    pub external_id: Option<String>,
    /// Every attribute of the source row, as stored.
    pub attributes: Map<String, Value>,
}

impl HeritageProperties {
    /// Builds the typed view from a raw attribute map.
    ///
    /// String and numeric values are accepted; blank strings, nulls, and
    /// other JSON types count as absent.
    #[must_use]
    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            name: first_text(&attributes, &NAME_KEYS),
            kind_code: first_text(&attributes, &KIND_CODE_KEYS),
            sido_name: first_text(&attributes, &SIDO_KEYS),
            external_id: first_text(&attributes, &EXTERNAL_ID_KEYS),
            attributes,
        }
    }
}

fn first_text(attributes: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match attributes.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
