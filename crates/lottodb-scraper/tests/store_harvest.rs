//! Integration tests for the historical store harvest.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made. Store-page bodies are served EUC-KR encoded,
//! exactly as the live site serves them, so the fixed-codec decode path is
//! exercised end to end.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lottodb_scraper::harvest::{
    harvest_stores, resolve_end_round, BatchCheckpoint, HarvestOptions, FALLBACK_LATEST_ROUND,
};
use lottodb_scraper::{CancelFlag, LottoClient, ScraperError};

fn test_client(server: &MockServer) -> LottoClient {
    // 1s timeout, 3 attempts, zero backoff so timeout tests don't crawl.
    LottoClient::new(&server.uri(), 1, "lottodb-test/0.1", 3, 0)
        .expect("failed to build test LottoClient")
}

fn fast_options(start: u32, end: u32) -> HarvestOptions {
    HarvestOptions {
        start_round: start,
        end_round: Some(end),
        batch_size: 100,
        inter_round_delay_ms: 0,
        inter_batch_delay_ms: 0,
    }
}

/// Builds a listing page with the given first-prize rows plus a second-prize
/// block that must never be consumed.
fn store_page(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (name, addr))| {
            format!(
                "<tr><td>{}</td><td>{name}</td><td>자동</td><td>{addr}</td><td>보기</td></tr>",
                i + 1
            )
        })
        .collect();
    format!(
        "<html><body>\
         <div class=\"group_content\"><table><tbody>{body}</tbody></table></div>\
         <div class=\"group_content\"><table><tbody>\
         <tr><td>1</td><td>이등배출점</td><td>수동</td><td>광주 북구 9</td><td>보기</td></tr>\
         </tbody></table></div>\
         </body></html>"
    )
}

/// EUC-KR-encoded 200 response, as the live site serves store pages.
fn euc_kr_page(html: &str) -> ResponseTemplate {
    let (encoded, _, _) = encoding_rs::EUC_KR.encode(html);
    ResponseTemplate::new(200).set_body_raw(encoded.into_owned(), "text/html; charset=euc-kr")
}

async fn mount_round(server: &MockServer, round: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/store.do"))
        .and(query_param("method", "topStore"))
        .and(query_param("drwNo", round.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// End-to-end scenario: two good rounds, one timed-out round
// ---------------------------------------------------------------------------

#[tokio::test]
async fn harvest_aggregates_ranks_and_isolates_a_timed_out_round() {
    let server = MockServer::start().await;

    mount_round(&server, 601, euc_kr_page(&store_page(&[("가게A", "서울 중구 1")]))).await;
    mount_round(
        &server,
        602,
        euc_kr_page(&store_page(&[
            ("가게A", "서울 중구 1"),
            ("가게B", "부산 해운대구 2"),
        ])),
    )
    .await;
    // Round 603 stalls past the client's 1s timeout on every attempt.
    Mock::given(method("GET"))
        .and(path("/store.do"))
        .and(query_param("drwNo", "603"))
        .respond_with(euc_kr_page(&store_page(&[])).set_delay(Duration::from_secs(5)))
        .expect(3) // 3 total attempts, then the round is given up
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = harvest_stores(&client, &fast_options(601, 603), &CancelFlag::new(), None)
        .await
        .expect("harvest should complete despite the failed round");

    assert_eq!(outcome.report.rounds_attempted, 3);
    assert_eq!(outcome.report.rounds_succeeded, 2);
    assert_eq!(outcome.report.rounds_failed, 1);
    assert_eq!(outcome.report.failed_rounds, vec![603]);
    assert_eq!(outcome.report.collected_stores, 2);

    assert_eq!(outcome.stores.len(), 2);
    assert_eq!(outcome.stores[0].store_name, "가게A");
    assert_eq!(outcome.stores[0].wins_1st, 2);
    assert_eq!(outcome.stores[0].total_wins, 2);
    assert_eq!(outcome.stores[0].rank, 1);
    assert_eq!(outcome.stores[0].region, "서울");
    assert_eq!(outcome.stores[1].store_name, "가게B");
    assert_eq!(outcome.stores[1].wins_1st, 1);
    assert_eq!(outcome.stores[1].rank, 2);
    assert_eq!(outcome.stores[1].region, "부산");
}

#[tokio::test]
async fn repeated_harvests_over_identical_pages_are_deterministic() {
    let server = MockServer::start().await;

    // Two stores tied at one win each; first-seen order must decide ranks.
    mount_round(
        &server,
        601,
        euc_kr_page(&store_page(&[
            ("나중가게", "대전 서구 5"),
            ("먼저가게", "대구 중구 3"),
        ])),
    )
    .await;

    let client = test_client(&server);
    let options = fast_options(601, 601);

    let first = harvest_stores(&client, &options, &CancelFlag::new(), None)
        .await
        .unwrap();
    let second = harvest_stores(&client, &options, &CancelFlag::new(), None)
        .await
        .unwrap();

    assert_eq!(first.stores, second.stores);
    assert_eq!(first.report, second.report);
    assert_eq!(first.stores[0].store_name, "나중가게");
    assert_eq!(first.stores[0].rank, 1);
    assert_eq!(first.stores[1].store_name, "먼저가게");
    assert_eq!(first.stores[1].rank, 2);
}

// ---------------------------------------------------------------------------
// Failure isolation and classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transport_error_is_not_retried_and_does_not_abort_the_range() {
    let server = MockServer::start().await;

    mount_round(&server, 700, euc_kr_page(&store_page(&[("가게A", "서울 중구 1")]))).await;
    // HTTP 500 is treated as persistent: exactly one attempt.
    Mock::given(method("GET"))
        .and(path("/store.do"))
        .and(query_param("drwNo", "701"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_round(&server, 702, euc_kr_page(&store_page(&[("가게A", "서울 중구 1")]))).await;

    let client = test_client(&server);
    let outcome = harvest_stores(&client, &fast_options(700, 702), &CancelFlag::new(), None)
        .await
        .unwrap();

    assert_eq!(outcome.report.rounds_succeeded, 2);
    assert_eq!(outcome.report.failed_rounds, vec![701]);
    // Rounds on both sides of the failure still contributed.
    assert_eq!(outcome.stores[0].wins_1st, 2);
}

#[tokio::test]
async fn structure_mismatch_counts_as_failed_round() {
    let server = MockServer::start().await;

    mount_round(
        &server,
        800,
        euc_kr_page("<html><body><p>점검 중입니다</p></body></html>"),
    )
    .await;

    let client = test_client(&server);
    let outcome = harvest_stores(&client, &fast_options(800, 800), &CancelFlag::new(), None)
        .await
        .unwrap();

    assert_eq!(outcome.report.rounds_attempted, 1);
    assert_eq!(outcome.report.rounds_succeeded, 0);
    assert_eq!(outcome.report.failed_rounds, vec![800]);
    assert!(outcome.stores.is_empty());
}

#[tokio::test]
async fn empty_range_is_a_hard_error() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let result = harvest_stores(&client, &fast_options(700, 601), &CancelFlag::new(), None).await;
    assert!(
        matches!(
            result,
            Err(ScraperError::InvalidRange {
                start: 700,
                end: 601
            })
        ),
        "expected InvalidRange, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancelled_flag_stops_iteration_and_returns_partial_report() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let cancel = CancelFlag::new();
    cancel.cancel();

    let outcome = harvest_stores(&client, &fast_options(601, 700), &cancel, None)
        .await
        .unwrap();

    assert!(outcome.report.cancelled);
    assert_eq!(outcome.report.rounds_attempted, 0);
    assert!(outcome.stores.is_empty());
}

// ---------------------------------------------------------------------------
// End-round resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn explicit_end_round_wins_without_any_request() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    assert_eq!(resolve_end_round(&client, Some(950)).await, 950);
}

#[tokio::test]
async fn end_round_is_discovered_from_the_json_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/common.do"))
        .and(query_param("method", "getLottoNumber"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "returnValue": "success",
            "drwNo": 1150,
            "drwNoDate": "2024-12-14",
            "drwtNo1": 1, "drwtNo2": 2, "drwtNo3": 3,
            "drwtNo4": 4, "drwtNo5": 5, "drwtNo6": 6,
            "bnusNo": 7
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert_eq!(resolve_end_round(&client, None).await, 1150);
}

#[tokio::test]
async fn discovery_failure_degrades_to_the_fallback_round() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/common.do"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert_eq!(resolve_end_round(&client, None).await, FALLBACK_LATEST_ROUND);
}

// ---------------------------------------------------------------------------
// Batch checkpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_callback_fires_per_batch_and_at_range_end() {
    let server = MockServer::start().await;
    for round in 601..=605 {
        mount_round(&server, round, euc_kr_page(&store_page(&[("가게A", "서울 중구 1")]))).await;
    }

    let client = test_client(&server);
    let options = HarvestOptions {
        batch_size: 2,
        ..fast_options(601, 605)
    };

    let checkpoints: Arc<Mutex<Vec<BatchCheckpoint>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&checkpoints);
    let record = move |cp: &BatchCheckpoint| {
        sink.lock().unwrap().push(cp.clone());
    };

    let outcome = harvest_stores(&client, &options, &CancelFlag::new(), Some(&record))
        .await
        .unwrap();
    assert_eq!(outcome.report.rounds_succeeded, 5);

    drop(record);
    let seen = Arc::try_unwrap(checkpoints)
        .expect("callback clones dropped")
        .into_inner()
        .unwrap();
    let done: Vec<u32> = seen.iter().map(|cp| cp.rounds_done).collect();
    assert_eq!(done, vec![2, 4, 5]);
    assert!(seen.iter().all(|cp| cp.rounds_total == 5));
    // Per-batch counters reset between checkpoints.
    assert_eq!(seen[0].rounds_succeeded, 2);
    assert_eq!(seen[2].rounds_succeeded, 1);
}
