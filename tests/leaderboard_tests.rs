//! Integration tests for the customer leaderboard export.
//!
//! The segment query is answered by a wiremock server; the CSV is written to a
//! temporary directory and read back with `csv::Reader`.

use std::path::Path;
use std::time::Duration;

use serde_json::json;
use shopify_admin_tasks::tasks::leaderboard::{
    generate_customer_leaderboard, LeaderboardError, LeaderboardOptions, CSV_HEADER,
};
use shopify_admin_tasks::{AccessToken, GraphqlClient, StoreUrl, TasksConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/admin/api/2025-01/graphql.json";

fn create_test_client(server: &MockServer) -> GraphqlClient {
    let config = TasksConfig::builder()
        .store_url(StoreUrl::new(server.uri()).unwrap())
        .access_token(AccessToken::new("shpat_test_token").unwrap())
        .build()
        .unwrap();
    GraphqlClient::new(&config).unwrap()
}

fn options_for(output: &Path) -> LeaderboardOptions {
    LeaderboardOptions {
        output_path: output.to_path_buf(),
        ..LeaderboardOptions::default()
    }
}

fn member(n: usize, first: &str, last: &str, amount: &str) -> serde_json::Value {
    json!({
        "node": {
            "id": format!("gid://shopify/Customer/{n}"),
            "firstName": first,
            "lastName": last,
            "defaultEmailAddress": { "emailAddress": format!("{}@example.com", first.to_lowercase()) },
            "amountSpent": { "amount": amount, "currencyCode": "USD" }
        }
    })
}

fn segment_response(members: Vec<serde_json::Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": { "customerSegmentMembers": { "edges": members } }
    }))
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[tokio::test]
async fn test_sends_segment_query_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("customerSegmentMembers"))
        .and(body_string_contains(
            "customer_tags CONTAINS 'task1' AND customer_tags CONTAINS 'level:3'",
        ))
        .and(body_string_contains("\"sortKey\":\"amount_spent\""))
        .and(body_string_contains("\"reverse\":true"))
        .and(body_string_contains("\"first\":50"))
        .respond_with(segment_response(vec![member(1, "Ada", "Lovelace", "10.00")]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("top_50_customers.csv");

    let report = generate_customer_leaderboard(&create_test_client(&server), &options_for(&output))
        .await
        .unwrap();

    assert_eq!(report.exported, 1);
}

#[tokio::test]
async fn test_unparseable_amount_is_skipped_and_ranks_stay_dense() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(segment_response(vec![
            member(1, "Ada", "Lovelace", "120.00"),
            member(2, "Bad", "Amount", "bad"),
            member(3, "Grace", "Hopper", "45.50"),
        ]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    let report = generate_customer_leaderboard(&create_test_client(&server), &options_for(&output))
        .await
        .unwrap();

    assert_eq!(report.exported, 2);
    assert_eq!(report.skipped, 1);

    let (header, rows) = read_rows(&output);
    assert_eq!(header, CSV_HEADER);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        [
            "1",
            "gid://shopify/Customer/1",
            "Ada",
            "Lovelace",
            "ada@example.com",
            "120.00",
            "USD"
        ]
    );
    assert_eq!(rows[1][0], "2");
    assert_eq!(rows[1][1], "gid://shopify/Customer/3");
    assert_eq!(rows[1][5], "45.50");
}

#[tokio::test]
async fn test_null_amount_is_skipped_without_rejecting_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(segment_response(vec![
            member(1, "Ada", "Lovelace", "120.00"),
            json!({
                "node": {
                    "id": "gid://shopify/Customer/2",
                    "firstName": "Null",
                    "lastName": "Amount",
                    "amountSpent": { "amount": null, "currencyCode": "USD" }
                }
            }),
            member(3, "Grace", "Hopper", "45.50"),
        ]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    let report = generate_customer_leaderboard(&create_test_client(&server), &options_for(&output))
        .await
        .unwrap();

    assert_eq!(report.exported, 2);
    assert_eq!(report.skipped, 1);
    let (_, rows) = read_rows(&output);
    assert_eq!(rows[0][1], "gid://shopify/Customer/1");
    assert_eq!(rows[1][0], "2");
    assert_eq!(rows[1][1], "gid://shopify/Customer/3");
}

#[tokio::test]
async fn test_csv_round_trips_fields_needing_quotes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(segment_response(vec![
            member(1, "Mary, Jr.", "O\"Brien", "1000"),
            member(2, "Plain", "Name", "99.999"),
        ]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    generate_customer_leaderboard(&create_test_client(&server), &options_for(&output))
        .await
        .unwrap();

    let (_, rows) = read_rows(&output);
    assert_eq!(rows[0][2], "Mary, Jr.");
    assert_eq!(rows[0][3], "O\"Brien");
    assert_eq!(rows[0][5], "1000.00");
    assert_eq!(rows[1][5], "100.00");
}

#[tokio::test]
async fn test_missing_optional_fields_become_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "customerSegmentMembers": { "edges": [{
                "node": {
                    "id": "gid://shopify/Customer/9",
                    "firstName": null,
                    "lastName": null,
                    "defaultEmailAddress": null,
                    "amountSpent": { "amount": "5", "currencyCode": "CAD" }
                }
            }] } }
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    generate_customer_leaderboard(&create_test_client(&server), &options_for(&output))
        .await
        .unwrap();

    let (_, rows) = read_rows(&output);
    assert_eq!(
        rows[0],
        ["1", "gid://shopify/Customer/9", "", "", "", "5.00", "CAD"]
    );
}

#[tokio::test]
async fn test_more_than_fifty_members_are_capped() {
    let server = MockServer::start().await;
    let members = (1..=60)
        .map(|n| member(n, "Customer", "Name", &format!("{}.00", 1000 - n)))
        .collect();
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(segment_response(members))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    let report = generate_customer_leaderboard(&create_test_client(&server), &options_for(&output))
        .await
        .unwrap();

    assert_eq!(report.exported, 50);
    let (_, rows) = read_rows(&output);
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[49][0], "50");
}

#[tokio::test]
async fn test_no_members_fails_without_writing_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(segment_response(vec![]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    let result =
        generate_customer_leaderboard(&create_test_client(&server), &options_for(&output)).await;

    match result {
        Err(e @ LeaderboardError::NoCustomers) => {
            assert_eq!(e.to_string(), "no customers found with required tags");
        }
        other => panic!("Expected NoCustomers, got: {other:?}"),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn test_all_amounts_unparseable_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(segment_response(vec![member(1, "Bad", "Amount", "n/a")]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    let result =
        generate_customer_leaderboard(&create_test_client(&server), &options_for(&output)).await;

    assert!(matches!(result, Err(LeaderboardError::NoCustomers)));
}

#[tokio::test]
async fn test_graphql_errors_fail_the_export() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Access denied for customerSegmentMembers field." }]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");

    let result =
        generate_customer_leaderboard(&create_test_client(&server), &options_for(&output)).await;

    match result {
        Err(e @ LeaderboardError::Fetch(_)) => {
            assert!(e.to_string().contains("Access denied"));
        }
        other => panic!("Expected Fetch error, got: {other:?}"),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            segment_response(vec![member(1, "Ada", "Lovelace", "10.00")])
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("leaderboard.csv");
    let options = LeaderboardOptions {
        timeout: Duration::from_millis(100),
        ..options_for(&output)
    };

    let result = generate_customer_leaderboard(&create_test_client(&server), &options).await;

    assert!(matches!(result, Err(LeaderboardError::Timeout(d)) if d == Duration::from_millis(100)));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_unwritable_output_path_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(segment_response(vec![member(1, "Ada", "Lovelace", "10.00")]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing-dir").join("leaderboard.csv");

    let result =
        generate_customer_leaderboard(&create_test_client(&server), &options_for(&output)).await;

    assert!(matches!(result, Err(LeaderboardError::CreateFile { .. })));
}
