//! Heritage name normalization and the name-similarity heuristic.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthetical regex"));
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]").expect("valid non-alphanumeric regex"));

/// Highest score the character-overlap fallback can award.
const OVERLAP_MAX: f64 = 60.0;

/// Normalizes a heritage name for comparison.
///
/// Drops parenthetical segments (`경복궁(서울)` → `경복궁`), lower-cases, then
/// removes every character that is not a Unicode letter or number. Total and
/// idempotent.
#[must_use]
pub fn normalize_name(s: &str) -> String {
    let without_parens = PARENTHETICAL_RE.replace_all(s, "");
    let lowered = without_parens.to_lowercase();
    NON_ALNUM_RE.replace_all(&lowered, "").into_owned()
}

/// Scores how well `target` matches `query`, from 0 to 100.
///
/// | Relation after normalization | Score |
/// |------------------------------|-------|
/// | either side empty            | 0     |
/// | equal                        | 100   |
/// | target contains query        | 80    |
/// | query contains target        | 70    |
/// | otherwise                    | shared characters of `query` found in `target`, over the shorter length, scaled to 0–60 |
///
/// Not symmetric: `name_score("한옥", "한옥마을")` is 80 while
/// `name_score("한옥마을", "한옥")` is 70.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn name_score(query: &str, target: &str) -> u32 {
    let q = normalize_name(query);
    let t = normalize_name(target);
    if q.is_empty() || t.is_empty() {
        return 0;
    }
    if q == t {
        return 100;
    }
    if t.contains(q.as_str()) {
        return 80;
    }
    if q.contains(t.as_str()) {
        return 70;
    }

    let min_len = q.chars().count().min(t.chars().count()).max(1);
    let common = q.chars().filter(|c| t.contains(*c)).count();

    let ratio = common as f64 / min_len as f64;
    // Repeated query characters can push the ratio past 1.
    (ratio * OVERLAP_MAX).round().min(OVERLAP_MAX) as u32
}
