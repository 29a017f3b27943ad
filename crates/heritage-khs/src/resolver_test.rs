use std::collections::HashMap;
use std::sync::Mutex;

use super::*;
use crate::geo::EARTH_RADIUS_KM;

const CLICK: GeoPoint = GeoPoint {
    lon: 126.975_24,
    lat: 37.559_94,
};

/// In-memory source: fixed list items, details keyed by asno.
#[derive(Default)]
struct StubSource {
    list_fails: bool,
    items: Vec<ListItem>,
    details: HashMap<String, DetailRecord>,
    list_queries: Mutex<Vec<ListQuery>>,
    detail_keys: Mutex<Vec<DetailKey>>,
}

impl StubSource {
    fn with_items(items: Vec<ListItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    fn with_detail(mut self, asno: &str, detail: DetailRecord) -> Self {
        self.details.insert(asno.to_string(), detail);
        self
    }

    fn fetched_asnos(&self) -> Vec<String> {
        self.detail_keys
            .lock()
            .unwrap()
            .iter()
            .map(|k| k.external_id.clone())
            .collect()
    }
}

impl HeritageSource for StubSource {
    async fn list(&self, query: &ListQuery) -> Result<Vec<ListItem>, KhsError> {
        self.list_queries.lock().unwrap().push(query.clone());
        if self.list_fails {
            return Err(KhsError::UnexpectedStatus {
                endpoint: "List",
                status: 500,
            });
        }
        Ok(self.items.clone())
    }

    async fn detail(&self, key: &DetailKey) -> Result<DetailRecord, KhsError> {
        self.detail_keys.lock().unwrap().push(key.clone());
        self.details
            .get(&key.external_id)
            .cloned()
            .ok_or(KhsError::UnexpectedStatus {
                endpoint: "Detail",
                status: 404,
            })
    }
}

fn item(asno: &str, title: &str) -> ListItem {
    ListItem {
        external_id: asno.to_string(),
        title: title.to_string(),
        kind_code: "11".to_string(),
        region_code: "11".to_string(),
    }
}

fn north_of_click(km: f64) -> (f64, f64) {
    (CLICK.lon, CLICK.lat + (km / EARTH_RADIUS_KM).to_degrees())
}

fn detail_at(title: &str, km_from_click: Option<f64>) -> DetailRecord {
    let (longitude, latitude) = match km_from_click.map(north_of_click) {
        Some((lon, lat)) => (Some(lon), Some(lat)),
        None => (None, None),
    };
    DetailRecord {
        title: title.to_string(),
        kind: "국보".to_string(),
        longitude,
        latitude,
        ..DetailRecord::default()
    }
}

fn request(name: &str) -> ResolveRequest {
    ResolveRequest {
        kind_code: String::new(),
        region_code: String::new(),
        name: name.to_string(),
        click: CLICK,
    }
}

#[tokio::test]
async fn single_nearby_exact_match_scores_140() {
    let source = StubSource::with_items(vec![item("00010000", "숭례문")])
        .with_detail("00010000", detail_at("숭례문", Some(0.1)));
    let resolver = Resolver::new(source);

    let best = resolver.resolve(&request("숭례문")).await.expect("resolved");

    assert!(best.score >= 140, "score was {}", best.score);
    assert_eq!(best.score, 140);
    assert_eq!(best.external_id, "00010000");
    assert_eq!(best.detail.external_id.as_deref(), Some("00010000"));
    assert_eq!(best.detail.title, "숭례문");
}

#[tokio::test]
async fn empty_list_is_no_list_results() {
    let resolver = Resolver::new(StubSource::with_items(Vec::new()));
    let err = resolver.resolve(&request("숭례문")).await.unwrap_err();
    assert!(matches!(err, ResolveError::NoListResults));
    assert_eq!(err.to_string(), "목록 결과 없음");
    assert!(err.is_no_results());
}

#[tokio::test]
async fn all_detail_failures_is_no_scorable_candidate() {
    let source = StubSource::with_items(vec![item("1", "숭례문"), item("2", "흥인지문")]);
    let resolver = Resolver::new(source);

    let err = resolver.resolve(&request("숭례문")).await.unwrap_err();

    assert!(matches!(err, ResolveError::NoScorableCandidate));
    assert_eq!(err.to_string(), "후보 상세 평가 실패");
    assert_eq!(resolver.source().fetched_asnos(), vec!["1", "2"]);
}

#[tokio::test]
async fn list_failure_carries_status() {
    let source = StubSource {
        list_fails: true,
        ..StubSource::default()
    };
    let resolver = Resolver::new(source);

    let err = resolver.resolve(&request("숭례문")).await.unwrap_err();

    assert!(matches!(err, ResolveError::List(_)));
    assert!(err.to_string().contains("List 500"), "got {err}");
    assert!(!err.is_no_results());
}

#[tokio::test]
async fn only_top_five_by_name_get_detail_lookups() {
    let items = vec![
        item("a", "불국사"),
        item("b", "숭례문 현판"),
        item("c", "석굴암"),
        item("d", "숭례문"),
        item("e", "서울 숭례문"),
        item("f", "례문"),
        item("g", "숭문"),
    ];
    let resolver = Resolver::new(StubSource::with_items(items));

    let _ = resolver.resolve(&request("숭례문")).await;

    // d=100, b=80, e=80, f=70, g=60, then a=0, c=0.
    assert_eq!(
        resolver.source().fetched_asnos(),
        vec!["d", "b", "e", "f", "g"]
    );
}

#[tokio::test]
async fn top_n_is_configurable() {
    let items = vec![item("1", "숭례문"), item("2", "숭례문"), item("3", "숭례문")];
    let resolver = Resolver::new(StubSource::with_items(items)).with_top_n(2);

    let _ = resolver.resolve(&request("숭례문")).await;

    assert_eq!(resolver.source().fetched_asnos().len(), 2);
}

#[tokio::test]
async fn partial_detail_failure_is_tolerated() {
    let source = StubSource::with_items(vec![item("missing", "숭례문"), item("ok", "숭례문")])
        .with_detail("ok", detail_at("숭례문", None));
    let resolver = Resolver::new(source);

    let best = resolver.resolve(&request("숭례문")).await.expect("resolved");

    assert_eq!(best.external_id, "ok");
    assert_eq!(best.score, 100);
}

#[tokio::test]
async fn nearer_candidate_beats_farther_namesake() {
    let source = StubSource::with_items(vec![item("far", "석탑"), item("near", "석탑")])
        .with_detail("far", detail_at("석탑", Some(20.0)))
        .with_detail("near", detail_at("석탑", Some(0.8)));
    let resolver = Resolver::new(source);

    let best = resolver.resolve(&request("석탑")).await.expect("resolved");

    assert_eq!(best.external_id, "near");
    assert_eq!(best.score, 130);
}

#[tokio::test]
async fn unnamed_feature_is_resolved_by_distance_alone() {
    let source = StubSource::with_items(vec![item("far", "석탑"), item("near", "당간지주")])
        .with_detail("far", detail_at("석탑", Some(2.0)))
        .with_detail("near", detail_at("당간지주", Some(0.0)));
    let resolver = Resolver::new(source);

    let best = resolver.resolve(&request("")).await.expect("resolved");

    assert_eq!(best.external_id, "near");
    assert_eq!(best.score, 40);
    let queries = resolver.source().list_queries.lock().unwrap();
    assert_eq!(queries[0].name, "");
}

#[tokio::test]
async fn ties_keep_the_higher_ranked_candidate() {
    let source = StubSource::with_items(vec![item("first", "석탑"), item("second", "석탑")])
        .with_detail("first", detail_at("석탑", Some(2.0)))
        .with_detail("second", detail_at("석탑", Some(2.5)));
    let resolver = Resolver::new(source);

    let best = resolver.resolve(&request("석탑")).await.expect("resolved");

    assert_eq!(best.external_id, "first");
}

#[tokio::test]
async fn detail_title_not_list_title_drives_the_score() {
    let source = StubSource::with_items(vec![item("1", "숭례문")])
        .with_detail("1", detail_at("서울 숭례문 일대", None));
    let resolver = Resolver::new(source);

    let best = resolver.resolve(&request("숭례문")).await.expect("resolved");

    assert_eq!(best.score, 80);
}

#[tokio::test]
async fn request_codes_override_candidate_codes() {
    let mut listed = item("1", "숭례문");
    listed.kind_code = "13".to_string();
    listed.region_code = "21".to_string();
    let source =
        StubSource::with_items(vec![listed]).with_detail("1", detail_at("숭례문", None));
    let resolver = Resolver::new(source);

    let mut req = request("숭례문");
    req.kind_code = " 11 ".to_string();
    let _ = resolver.resolve(&req).await.expect("resolved");

    let keys = resolver.source().detail_keys.lock().unwrap().clone();
    assert_eq!(keys[0].kind_code, "11");
    assert_eq!(keys[0].region_code, "21");

    let queries = resolver.source().list_queries.lock().unwrap().clone();
    assert_eq!(queries[0].kind_code, "11");
    assert_eq!(queries[0].region_code, "");
    assert_eq!(queries[0].page_size, DEFAULT_LIST_PAGE_SIZE);
}

#[tokio::test]
async fn candidates_without_asno_or_codes_are_skipped() {
    let mut no_codes = item("nocodes", "숭례문");
    no_codes.kind_code.clear();
    let source = StubSource::with_items(vec![item("", "숭례문"), no_codes]);
    let resolver = Resolver::new(source);

    let err = resolver.resolve(&request("숭례문")).await.unwrap_err();

    assert!(matches!(err, ResolveError::NoScorableCandidate));
    assert!(resolver.source().fetched_asnos().is_empty());
}

#[tokio::test]
async fn resolve_until_reports_cancellation() {
    let source = StubSource::with_items(vec![item("1", "숭례문")])
        .with_detail("1", detail_at("숭례문", Some(0.1)));
    let resolver = Resolver::new(source);

    let err = resolver
        .resolve_until(&request("숭례문"), std::future::ready(()))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Cancelled));
    assert!(resolver.source().list_queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn resolve_until_returns_result_when_not_cancelled() {
    let source = StubSource::with_items(vec![item("1", "숭례문")])
        .with_detail("1", detail_at("숭례문", Some(0.1)));
    let resolver = Resolver::new(source);

    let best = resolver
        .resolve_until(&request("숭례문"), std::future::pending())
        .await
        .expect("resolved");

    assert_eq!(best.external_id, "1");
}

#[test]
fn score_without_coordinates_is_name_only() {
    let detail = detail_at("숭례문", None);
    assert_eq!(score_detail("숭례문", &detail, CLICK), 100);
}

#[test]
fn score_is_bounded_by_140() {
    let detail = detail_at("숭례문", Some(0.0));
    assert_eq!(score_detail("숭례문", &detail, CLICK), 140);
}
