//! XML parsing for KHS list and detail responses.
//!
//! Both responses are flat documents of text elements. Fields are looked up
//! by local element name and the first occurrence wins, so namespace prefixes
//! and wrapper elements do not matter.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::KhsError;
use crate::types::{DetailRecord, ListItem};

/// Parses every `<item>` of a list response.
///
/// # Errors
///
/// Returns [`KhsError::Xml`] if the document is malformed.
pub fn parse_list_items(xml: &str) -> Result<Vec<ListItem>, KhsError> {
    let mut items = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();

    walk_elements(xml, |ancestors, name, text| {
        if name == "item" {
            let mut take = |key: &str| fields.remove(key).unwrap_or_default();
            items.push(ListItem {
                external_id: take("ccbaAsno"),
                title: take("ccbaMnm1"),
                kind_code: take("ccbaKdcd"),
                region_code: take("ccbaCtcd"),
            });
            fields.clear();
        } else if ancestors.iter().any(|a| a == "item") {
            fields
                .entry(name.to_string())
                .or_insert_with(|| text.to_string());
        }
    })?;

    Ok(items)
}

/// Parses a detail response into a [`DetailRecord`].
///
/// `content` is preferred over `ccbaCn` for the description. `external_id`
/// is left unset; the caller knows which asset number it asked for.
///
/// # Errors
///
/// - [`KhsError::Xml`] if the document is malformed.
/// - [`KhsError::MissingField`] if there is no `<ccbaMnm1>` element at all,
///   which is how the API answers unknown keys.
pub fn parse_detail(xml: &str) -> Result<DetailRecord, KhsError> {
    let mut first: HashMap<String, String> = HashMap::new();
    walk_elements(xml, |_, name, text| {
        first
            .entry(name.to_string())
            .or_insert_with(|| text.to_string());
    })?;

    let title = first
        .get("ccbaMnm1")
        .cloned()
        .ok_or(KhsError::MissingField("ccbaMnm1"))?;
    let text = |key: &str| first.get(key).filter(|v| !v.is_empty()).cloned();

    Ok(DetailRecord {
        title,
        kind: text("ccmaName").unwrap_or_default(),
        region_name: text("ccbaCtcdNm"),
        admin_office: text("ccbaAdmin"),
        description: text("content").or_else(|| text("ccbaCn")),
        image_url: text("imageUrl"),
        longitude: text("longitude").as_deref().and_then(parse_coordinate),
        latitude: text("latitude").as_deref().and_then(parse_coordinate),
        external_id: None,
    })
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Streams `xml` and calls `on_close(ancestors, local_name, text)` as each
/// element closes. `text` is the element's own trimmed text and CDATA;
/// self-closing elements report an empty string.
fn walk_elements<F>(xml: &str, mut on_close: F) -> Result<(), KhsError>
where
    F: FnMut(&[String], &str, &str),
{
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut names: Vec<String> = Vec::new();
    let mut texts: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                names.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                texts.push(String::new());
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                on_close(&names, &name, "");
            }
            Event::Text(e) => {
                if let Some(text) = texts.last_mut() {
                    text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::CData(e) => {
                if let Some(text) = texts.last_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                if let (Some(name), Some(text)) = (names.pop(), texts.pop()) {
                    on_close(&names, &name, text.trim());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}
