//! 시도 (province-level) display names to KHS `ccbaCtcd` region codes.

/// Looks up the KHS region code for a province display name.
///
/// Both the current and the pre-reform names are accepted for provinces that
/// were renamed (강원도/강원특별자치도, 전라북도/전북특별자치도).
#[must_use]
pub fn ctcd_by_sido_name(sido: &str) -> Option<&'static str> {
    let code = match sido.trim() {
        "서울특별시" => "11",
        "부산광역시" => "21",
        "대구광역시" => "22",
        "인천광역시" => "23",
        "광주광역시" => "24",
        "대전광역시" => "25",
        "울산광역시" => "26",
        "세종특별자치시" => "45",
        "경기도" => "31",
        "강원특별자치도" | "강원도" => "32",
        "충청북도" => "33",
        "충청남도" => "34",
        "전북특별자치도" | "전라북도" => "35",
        "전라남도" => "36",
        "경상북도" => "37",
        "경상남도" => "38",
        "제주특별자치도" => "50",
        "전국일원" => "ZZ",
        _ => return None,
    };
    Some(code)
}
