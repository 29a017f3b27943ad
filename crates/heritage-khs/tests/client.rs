//! Integration tests for `KhsClient` and `Resolver` using wiremock HTTP mocks.

use heritage_khs::{
    DetailKey, GeoPoint, KhsClient, KhsError, ListQuery, ResolveError, ResolveRequest, Resolver,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIST_PATH: &str = "/cha/SearchKindOpenapiList.do";
const DETAIL_PATH: &str = "/cha/SearchKindOpenapiDt.do";

fn test_client(server: &MockServer) -> KhsClient {
    KhsClient::with_base_url(&format!("{}/cha", server.uri()), 30, "heritage-test/0.1")
        .expect("client construction should not fail")
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/xml")
}

fn sungnyemun_request() -> ResolveRequest {
    ResolveRequest {
        kind_code: "11".to_string(),
        region_code: "11".to_string(),
        name: "숭례문".to_string(),
        click: GeoPoint::new(126.975_24, 37.559_94),
    }
}

const LIST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <totalCnt>2</totalCnt>
  <item>
    <ccbaKdcd>11</ccbaKdcd>
    <ccbaAsno>00010000</ccbaAsno>
    <ccbaCtcd>11</ccbaCtcd>
    <ccbaMnm1>숭례문</ccbaMnm1>
  </item>
  <item>
    <ccbaKdcd>11</ccbaKdcd>
    <ccbaAsno>00020000</ccbaAsno>
    <ccbaCtcd>11</ccbaCtcd>
    <ccbaMnm1>서울 원각사지 십층석탑</ccbaMnm1>
  </item>
</result>"#;

const SUNGNYEMUN_DETAIL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <ccbaAsno>00010000</ccbaAsno>
  <longitude>126.97524</longitude>
  <latitude>37.55994</latitude>
  <item>
    <ccbaMnm1>숭례문</ccbaMnm1>
    <ccmaName>국보</ccmaName>
    <ccbaCtcdNm>서울</ccbaCtcdNm>
    <content>조선시대 한양도성의 정문</content>
  </item>
</result>"#;

#[tokio::test]
async fn list_items_sends_query_and_parses_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("ccbaKdcd", "11"))
        .and(query_param("ccbaCtcd", "11"))
        .and(query_param("ccbaMnm1", "숭례문"))
        .and(query_param("pageNo", "1"))
        .and(query_param("numOfRows", "50"))
        .respond_with(xml(LIST_XML))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .list_items(&ListQuery {
            kind_code: "11".to_string(),
            region_code: "11".to_string(),
            name: "숭례문".to_string(),
            page_size: 50,
        })
        .await
        .expect("should parse list");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].external_id, "00010000");
    assert_eq!(items[1].title, "서울 원각사지 십층석탑");
}

#[tokio::test]
async fn detail_xml_is_returned_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .and(query_param("ccbaKdcd", "11"))
        .and(query_param("ccbaAsno", "00010000"))
        .and(query_param("ccbaCtcd", "11"))
        .respond_with(xml(SUNGNYEMUN_DETAIL_XML))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let body = client
        .fetch_detail_xml(&DetailKey {
            kind_code: "11".to_string(),
            external_id: "00010000".to_string(),
            region_code: "11".to_string(),
        })
        .await
        .expect("should fetch detail");

    assert_eq!(body, SUNGNYEMUN_DETAIL_XML);
}

#[tokio::test]
async fn non_success_status_is_reported_with_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .detail(&DetailKey {
            kind_code: "11".to_string(),
            external_id: "1".to_string(),
            region_code: "11".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        KhsError::UnexpectedStatus {
            endpoint: "Detail",
            status: 503
        }
    ));
}

#[tokio::test]
async fn resolver_picks_the_exact_nearby_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(xml(LIST_XML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .and(query_param("ccbaAsno", "00010000"))
        .respond_with(xml(SUNGNYEMUN_DETAIL_XML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .and(query_param("ccbaAsno", "00020000"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = Resolver::new(test_client(&server));
    let best = resolver
        .resolve(&sungnyemun_request())
        .await
        .expect("should resolve");

    assert_eq!(best.score, 140);
    assert_eq!(best.external_id, "00010000");
    assert_eq!(best.detail.kind, "국보");

    let json = serde_json::to_value(&best).expect("serialize");
    assert_eq!(json["externalId"], "00010000");
    assert_eq!(json["detail"]["externalId"], "00010000");
    assert_eq!(json["detail"]["regionName"], "서울");
}

#[tokio::test]
async fn resolver_reports_list_failure_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = Resolver::new(test_client(&server));
    let err = resolver.resolve(&sungnyemun_request()).await.unwrap_err();

    assert!(matches!(err, ResolveError::List(_)));
    assert!(err.to_string().contains("List 500"), "got {err}");
}

#[tokio::test]
async fn resolver_reports_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(xml("<result><totalCnt>0</totalCnt></result>"))
        .mount(&server)
        .await;

    let resolver = Resolver::new(test_client(&server));
    let err = resolver.resolve(&sungnyemun_request()).await.unwrap_err();

    assert_eq!(err.to_string(), "목록 결과 없음");
}

#[tokio::test]
async fn resolver_reports_when_every_detail_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(xml(LIST_XML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = Resolver::new(test_client(&server));
    let err = resolver.resolve(&sungnyemun_request()).await.unwrap_err();

    assert_eq!(err.to_string(), "후보 상세 평가 실패");
}

#[tokio::test]
async fn detail_without_title_is_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(xml(LIST_XML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .and(query_param("ccbaAsno", "00010000"))
        .respond_with(xml("<result><resultMsg>no data</resultMsg></result>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .and(query_param("ccbaAsno", "00020000"))
        .respond_with(xml(
            "<result><item><ccbaMnm1>서울 원각사지 십층석탑</ccbaMnm1></item></result>",
        ))
        .mount(&server)
        .await;

    let resolver = Resolver::new(test_client(&server));
    let best = resolver
        .resolve(&sungnyemun_request())
        .await
        .expect("second candidate should resolve");

    assert_eq!(best.external_id, "00020000");
    assert!(best.score < 100);
}
