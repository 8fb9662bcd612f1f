//! FILER client tests against a mocked upstream

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use goa_common::types::GenomicSpan;
use goa_server::params::Parameters;
use goa_server::query::filer::FilerClient;
use goa_server::query::{DataSource, QueryError};
use goa_server::response::{ResponseContent, ResponseData};

fn span() -> GenomicSpan {
    "chr1:1000-2000".parse().unwrap()
}

fn hit(track_id: &str, start: u64) -> serde_json::Value {
    json!({
        "chrom": "chr1",
        "chromStart": start,
        "chromEnd": start + 200,
        "name": "peak",
        "score": 812.0,
        "strand": ".",
        "Identifier": track_id
    })
}

#[tokio::test]
async fn test_overlaps_parses_hits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_overlaps"))
        .and(query_param("span", "chr1:1000-2000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([hit("NGEN00001", 1100), hit("NGEN00001", 1500)])),
        )
        .mount(&server)
        .await;

    let client = FilerClient::new(server.uri());
    let intervals = client
        .overlaps(&["NGEN00001".to_string()], &span())
        .await
        .unwrap();

    assert_eq!(intervals.len(), 2);
    assert_eq!(intervals[0].chrom, "chr1");
    assert_eq!(intervals[0].start, 1100);
    assert_eq!(intervals[0].end, 1300);
    assert_eq!(intervals[0].track_id, "NGEN00001");
}

#[tokio::test]
async fn test_upstream_error_is_a_lookup_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_overlaps"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = FilerClient::new(server.uri());
    let err = client
        .overlaps(&["NGEN00001".to_string()], &span())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Lookup(_)));
}

#[tokio::test]
async fn test_malformed_body_is_a_lookup_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_overlaps"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = FilerClient::new(server.uri());
    let err = client
        .overlaps(&["NGEN00001".to_string()], &span())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Lookup(_)));
}

#[tokio::test]
async fn test_fetch_shapes_counts_per_track() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_overlaps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            hit("NGEN00001", 1100),
            hit("NGEN00001", 1500),
            hit("NGEN00002", 1200)
        ])))
        .mount(&server)
        .await;

    let client = FilerClient::new(server.uri());
    let mut params = Parameters::new();
    params.update("_tracks", json!(["NGEN00001", "NGEN00002"]));
    params.set_str("span", "chr1:1000-2000");

    let data = client
        .fetch(&params, ResponseContent::Counts)
        .await
        .unwrap();

    let ResponseData::Counts(counts) = data else {
        panic!("expected counts payload");
    };
    assert_eq!(counts.get("NGEN00001"), Some(&2));
    assert_eq!(counts.get("NGEN00002"), Some(&1));
}

#[tokio::test]
async fn test_fetch_requires_span() {
    let client = FilerClient::new("http://localhost:1");
    let mut params = Parameters::new();
    params.update("_tracks", json!(["NGEN00001"]));

    let err = client
        .fetch(&params, ResponseContent::Full)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidParameter(_)));
}
