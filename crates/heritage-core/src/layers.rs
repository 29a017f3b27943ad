//! GeoServer layer naming conventions for heritage feature types.
//!
//! Feature types are published as `<workspace>:<Region>_<...>_<Kind>`, e.g.
//! `sbsj:Seoul_point_Kookbo`. The region and kind segments are English keys
//! that map to the Korean labels the viewer shows.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Fill color applied to every heritage layer entry in the layer panel.
pub const DEFAULT_LAYER_FILL: &str = "rgba(100, 149, 237, 0.3)";

/// Korean category labels the viewer exposes as layer groups.
pub const TARGET_CATEGORIES: [&str; 4] = ["국보", "민속", "사적", "보물"];

const CITIES: [(&str, &str); 17] = [
    ("Busan", "부산"),
    ("Chungbuk", "충북"),
    ("Chungnam", "충남"),
    ("Daegu", "대구"),
    ("Daejeon", "대전"),
    ("Gangwon", "강원"),
    ("Gwangju", "광주"),
    ("Gyeongbuk", "경북"),
    ("Gyeonggi", "경기"),
    ("Gyeongnam", "경남"),
    ("Incheon", "인천"),
    ("Jeju", "제주"),
    ("Jeonbuk", "전북"),
    ("Jeonnam", "전남"),
    ("Sejong", "세종"),
    ("Seoul", "서울"),
    ("Ulsan", "울산"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    pub name: String,
    pub display_name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLayerName {
    /// Layer name without the workspace prefix.
    pub layer_name: String,
    /// First `_`-separated segment (English region key).
    pub region_name: String,
    /// Last `_`-separated segment (English category key).
    pub kind: String,
}

/// Splits a qualified feature type name into its region and kind segments.
///
/// Returns `None` when the name is outside `workspace` or has fewer than two
/// `_`-separated parts.
#[must_use]
pub fn parse_layer_name(full_name: &str, workspace: &str) -> Option<ParsedLayerName> {
    let layer_name = full_name
        .strip_prefix(workspace)
        .and_then(|rest| rest.strip_prefix(':'))?;
    let layer_name = layer_name.split(':').next().unwrap_or(layer_name);

    let parts: Vec<&str> = layer_name.split('_').collect();
    if parts.len() < 2 {
        return None;
    }

    Some(ParsedLayerName {
        layer_name: layer_name.to_string(),
        region_name: parts[0].to_string(),
        kind: parts[parts.len() - 1].to_string(),
    })
}

#[must_use]
pub fn city_korean(english: &str) -> Option<&'static str> {
    CITIES
        .iter()
        .find(|(en, _)| *en == english)
        .map(|(_, ko)| *ko)
}

#[must_use]
pub fn city_english(korean: &str) -> Option<&'static str> {
    CITIES
        .iter()
        .find(|(_, ko)| *ko == korean)
        .map(|(en, _)| *en)
}

/// Maps a layer kind segment to its Korean category. `Treasure` is the
/// spelling used in published layer names; `Bomul` is the romanized form.
#[must_use]
pub fn category_korean(kind: &str) -> Option<&'static str> {
    match kind {
        "Bomul" | "Treasure" => Some("보물"),
        "Folk" => Some("민속"),
        "Kookbo" => Some("국보"),
        "Sajeok" => Some("사적"),
        _ => None,
    }
}

/// Maps a WMS layer group name (`Kookbo_Group`, ...) to its Korean label.
#[must_use]
pub fn group_korean(group: &str) -> Option<&'static str> {
    match group {
        "Kookbo_Group" => Some("국보"),
        "Treasure_Group" => Some("보물"),
        "Folk_Group" => Some("민속"),
        "Sajeok_Group" => Some("사적"),
        _ => None,
    }
}

/// Builds one layer-panel entry per region that publishes at least one
/// layer in a target category, sorted by Korean display name.
#[must_use]
pub fn region_groups<'a, I>(feature_type_names: I, workspace: &str) -> Vec<LayerInfo>
where
    I: IntoIterator<Item = &'a str>,
{
    let regions: BTreeSet<String> = feature_type_names
        .into_iter()
        .filter_map(|name| parse_layer_name(name, workspace))
        .filter(|parsed| {
            category_korean(&parsed.kind).is_some_and(|ko| TARGET_CATEGORIES.contains(&ko))
        })
        .map(|parsed| {
            city_korean(&parsed.region_name)
                .map_or_else(|| parsed.region_name.clone(), str::to_string)
        })
        .collect();

    regions
        .into_iter()
        .map(|korean| {
            let english = city_english(&korean).map_or_else(|| korean.clone(), str::to_string);
            LayerInfo {
                name: format!("{english}_Group"),
                display_name: korean,
                color: DEFAULT_LAYER_FILL.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_layer_name_splits_region_and_kind() {
        let parsed = parse_layer_name("sbsj:Seoul_point_Kookbo", "sbsj").expect("parsed");
        assert_eq!(parsed.layer_name, "Seoul_point_Kookbo");
        assert_eq!(parsed.region_name, "Seoul");
        assert_eq!(parsed.kind, "Kookbo");
    }

    #[test]
    fn parse_layer_name_rejects_other_workspaces() {
        assert!(parse_layer_name("other:Seoul_Kookbo", "sbsj").is_none());
        assert!(parse_layer_name("sbsjx:Seoul_Kookbo", "sbsj").is_none());
    }

    #[test]
    fn parse_layer_name_requires_two_segments() {
        assert!(parse_layer_name("sbsj:kradmin", "sbsj").is_none());
    }

    #[test]
    fn city_maps_are_inverse() {
        assert_eq!(city_korean("Gyeonggi"), Some("경기"));
        assert_eq!(city_english("경기"), Some("Gyeonggi"));
        assert_eq!(city_korean("Atlantis"), None);
    }

    #[test]
    fn treasure_and_bomul_share_a_category() {
        assert_eq!(category_korean("Treasure"), Some("보물"));
        assert_eq!(category_korean("Bomul"), Some("보물"));
        assert_eq!(group_korean("Treasure_Group"), Some("보물"));
    }

    #[test]
    fn region_groups_dedupes_and_skips_non_heritage_layers() {
        let names = [
            "sbsj:Seoul_point_Kookbo",
            "sbsj:Seoul_point_Treasure",
            "sbsj:Busan_point_Sajeok",
            "sbsj:kr_admin1",
            "sbsj:Incheon_roads",
            "other:Jeju_point_Folk",
        ];
        let groups = region_groups(names, "sbsj");
        let display: Vec<&str> = groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(display, vec!["부산", "서울"]);
        assert_eq!(groups[1].name, "Seoul_Group");
        assert_eq!(groups[1].color, DEFAULT_LAYER_FILL);
    }

    #[test]
    fn region_groups_keeps_unmapped_regions_verbatim() {
        let groups = region_groups(["sbsj:Dokdo_point_Sajeok"], "sbsj");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].display_name, "Dokdo");
        assert_eq!(groups[0].name, "Dokdo_Group");
    }
}
