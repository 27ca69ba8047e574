//! End-to-end extraction tests against a mock GraphQL endpoint.
//!
//! These drive the full pipeline (HTTP client, traversal, column decoding)
//! and assert on request counts, headers, pagination behavior, and the
//! flattened output shape.

use boarddown::{BoardDown, Config, ExtractError};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_TOKEN: &str = "test-token";
const TEST_BOARD_ID: &str = "4321";

/// Wraps a JSON value the way the API ships column payloads: JSON-encoded
/// into a string.
fn encoded(value: Value) -> Value {
    Value::String(value.to_string())
}

fn column(title: &str, column_type: &str, value: Value) -> Value {
    json!({ "column": { "title": title }, "type": column_type, "value": value })
}

fn item(id: &str, name: &str, column_values: Value) -> Value {
    json!({ "id": id, "name": name, "column_values": column_values })
}

fn board_response(groups: Value) -> Value {
    json!({ "data": { "boards": [{ "name": "CRM", "groups": groups }] } })
}

fn next_page_response(cursor: Value, items: Value) -> Value {
    json!({ "data": { "next_items_page": { "cursor": cursor, "items": items } } })
}

async fn mount_root(server: &MockServer, response: Value, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("Authorization", TEST_TOKEN))
        .and(header("Content-Type", "application/json"))
        .and(body_string_contains("boards(ids: $ids)"))
        .and(body_partial_json(
            json!({ "variables": { "ids": [TEST_BOARD_ID] } }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_continuation(server: &MockServer, cursor: &str, response: Value) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("Authorization", TEST_TOKEN))
        .and(body_string_contains("next_items_page(cursor: $cursor)"))
        .and(body_partial_json(json!({ "variables": { "cursor": cursor } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(server)
        .await;
}

fn board_down_for(server: &MockServer) -> BoardDown {
    BoardDown::new(server.uri(), TEST_TOKEN)
}

#[tokio::test]
async fn two_groups_with_one_continuation_yields_four_records_in_two_calls() {
    let server = MockServer::start().await;

    mount_root(
        &server,
        board_response(json!([
            {
                "title": "Customers",
                "items_page": {
                    "cursor": null,
                    "items": [
                        item("1", "Acme", json!([
                            column("Phone", "phone", encoded(json!({ "phone": "12345", "countryShortName": "US" }))),
                        ])),
                        item("2", "Globex", json!([
                            column("Status", "status", encoded(json!({ "index": 2, "label": "Stuck" }))),
                        ])),
                    ]
                }
            },
            {
                "title": "Leads",
                "items_page": {
                    "cursor": "lead-cursor",
                    "items": [
                        item("3", "Initech", json!([
                            column("Notes", "text", encoded(json!("call back"))),
                        ])),
                    ]
                }
            }
        ])),
        1,
    )
    .await;

    mount_continuation(
        &server,
        "lead-cursor",
        next_page_response(
            json!(null),
            json!([item("4", "Umbrella", json!([
                column("Linked", "board_relation", encoded(json!({
                    "linkedPulseIds": [{ "linkedPulseId": 11 }, { "linkedPulseId": 22 }]
                }))),
            ]))]),
        ),
    )
    .await;

    let records = board_down_for(&server)
        .extract_board(TEST_BOARD_ID)
        .await
        .unwrap();

    assert_eq!(records.len(), 4);

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);

    let groups: Vec<&str> = records.iter().map(|r| r.group.as_str()).collect();
    assert_eq!(groups, ["Customers", "Customers", "Leads", "Leads"]);

    assert_eq!(records[0].field("Phone"), Some(&json!("12345")));
    assert_eq!(records[1].field("Status"), Some(&json!(2)));
    assert_eq!(records[2].field("Notes"), Some(&json!("call back")));
    assert_eq!(records[3].field("Linked"), Some(&json!("11;22")));

    // Mock expectations assert the call counts: exactly one root request
    // and exactly one continuation request.
    server.verify().await;
}

#[tokio::test]
async fn a_group_spanning_three_pages_is_fetched_page_by_page_in_order() {
    let server = MockServer::start().await;

    mount_root(
        &server,
        board_response(json!([
            {
                "title": "Backlog",
                "items_page": {
                    "cursor": "page-2",
                    "items": [item("a", "first", json!([]))]
                }
            }
        ])),
        1,
    )
    .await;

    mount_continuation(
        &server,
        "page-2",
        next_page_response(json!("page-3"), json!([item("b", "second", json!([]))])),
    )
    .await;
    mount_continuation(
        &server,
        "page-3",
        next_page_response(json!(null), json!([item("c", "third", json!([]))])),
    )
    .await;

    let records = board_down_for(&server)
        .extract_board(TEST_BOARD_ID)
        .await
        .unwrap();

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert!(records.iter().all(|r| r.group == "Backlog"));

    server.verify().await;
}

#[tokio::test]
async fn absent_cursor_means_no_continuation_request() {
    let server = MockServer::start().await;

    mount_root(
        &server,
        board_response(json!([
            {
                "title": "Done",
                "items_page": { "cursor": null, "items": [item("1", "only", json!([]))] }
            }
        ])),
        1,
    )
    .await;

    // Any continuation request is a failure.
    Mock::given(method("POST"))
        .and(body_string_contains("next_items_page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let records = board_down_for(&server)
        .extract_board(TEST_BOARD_ID)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    server.verify().await;
}

#[tokio::test]
async fn records_serialize_to_the_flat_json_shape() {
    let server = MockServer::start().await;

    mount_root(
        &server,
        board_response(json!([
            {
                "title": "Todo",
                "items_page": {
                    "cursor": null,
                    "items": [item("7", "Call dentist", json!([
                        column("Phone", "phone", encoded(json!({ "phone": "12345" }))),
                    ]))]
                }
            }
        ])),
        1,
    )
    .await;

    let records = board_down_for(&server)
        .extract_board(TEST_BOARD_ID)
        .await
        .unwrap();

    let serialized = serde_json::to_value(&records).unwrap();
    assert_eq!(
        serialized,
        json!([{
            "id": "7",
            "name": "Call dentist",
            "group": "Todo",
            "Phone": "12345",
            "type": "phone"
        }])
    );
}

#[tokio::test]
async fn zero_boards_fails_instead_of_returning_empty() {
    let server = MockServer::start().await;

    mount_root(&server, json!({ "data": { "boards": [] } }), 1).await;

    let err = board_down_for(&server)
        .extract_board(TEST_BOARD_ID)
        .await
        .unwrap_err();

    match err {
        ExtractError::Shape { message, .. } => {
            assert!(message.contains(TEST_BOARD_ID));
        }
        other => panic!("Expected Shape error, got {other:?}"),
    }
}

#[tokio::test]
async fn mid_pagination_failure_discards_all_progress() {
    let server = MockServer::start().await;

    mount_root(
        &server,
        board_response(json!([
            {
                "title": "Leads",
                "items_page": {
                    "cursor": "doomed-cursor",
                    "items": [item("1", "kept so far", json!([]))]
                }
            }
        ])),
        1,
    )
    .await;

    Mock::given(method("POST"))
        .and(body_string_contains("next_items_page"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = board_down_for(&server).extract_board(TEST_BOARD_ID).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn custom_config_flows_through_to_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("User-Agent", "extraction-job/1.0"))
        .and(header("Authorization", TEST_TOKEN))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "boards": [{ "name": "B", "groups": [] }] } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::builder()
        .api_url(server.uri())
        .api_token(TEST_TOKEN)
        .user_agent("extraction-job/1.0")
        .build();

    let records = BoardDown::with_config(config)
        .extract_board(TEST_BOARD_ID)
        .await
        .unwrap();

    assert!(records.is_empty());
    server.verify().await;
}
