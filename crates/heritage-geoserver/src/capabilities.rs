//! WFS `GetCapabilities` parsing.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::GeoServerError;

/// Extracts the qualified `<Name>` of every `<FeatureType>`, in document order.
///
/// Namespace prefixes (`wfs:FeatureType`) are ignored. Blank names are skipped.
///
/// # Errors
///
/// Returns [`GeoServerError::Xml`] if the document is malformed.
pub fn parse_feature_type_names(xml: &str) -> Result<Vec<String>, GeoServerError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut names = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "Name" {
                    current.clear();
                }
                stack.push(name);
            }
            Event::Text(e) => {
                if in_feature_type_name(&stack) {
                    current.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::CData(e) => {
                if in_feature_type_name(&stack) {
                    current.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                if in_feature_type_name(&stack) {
                    let name = current.trim();
                    if !name.is_empty() {
                        names.push(name.to_string());
                    }
                    current.clear();
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}

fn in_feature_type_name(stack: &[String]) -> bool {
    matches!(stack, [.., parent, leaf] if parent == "FeatureType" && leaf == "Name")
}
