//! End-to-end smoke tests for the TRIAGE API
//!
//! Each test spins up the real router on an ephemeral port with mock
//! providers and the in-memory store, then exercises it over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use triage_api::{create_api_router, ApiConfig, AppState};
use triage_core::{JudgmentError, RecommendedAction, TranslationError};
use triage_llm::{MockClassificationProvider, MockJudgmentProvider, MockTranslationProvider};
use triage_storage::InMemoryResultStore;

struct TestApp {
    addr: SocketAddr,
    translator: Arc<MockTranslationProvider>,
    classifier: Arc<MockClassificationProvider>,
    judge: Arc<MockJudgmentProvider>,
    store: Arc<InMemoryResultStore>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn spawn_app(
    translator: MockTranslationProvider,
    classifier: MockClassificationProvider,
    judge: MockJudgmentProvider,
) -> TestApp {
    spawn_app_with_config(translator, classifier, judge, ApiConfig::default()).await
}

async fn spawn_app_with_config(
    translator: MockTranslationProvider,
    classifier: MockClassificationProvider,
    judge: MockJudgmentProvider,
    config: ApiConfig,
) -> TestApp {
    let translator = Arc::new(translator);
    let classifier = Arc::new(classifier);
    let judge = Arc::new(judge);
    let store = Arc::new(InMemoryResultStore::new());

    let state = Arc::new(AppState::new(
        translator.clone(),
        classifier.clone(),
        judge.clone(),
        store.clone(),
        &config,
    ));
    let app = create_api_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr,
        translator,
        classifier,
        judge,
        store,
    }
}

fn happy_mocks() -> (
    MockTranslationProvider,
    MockClassificationProvider,
    MockJudgmentProvider,
) {
    (
        MockTranslationProvider::new("Internet has been completely down since morning"),
        MockClassificationProvider::for_cluster(3, 0.995),
        MockJudgmentProvider::approving(RecommendedAction::Escalate),
    )
}

async fn wait_for_persistence(store: &InMemoryResultStore) -> bool {
    for _ in 0..100 {
        if store.result_count().await > 0 {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

// ============================================================================
// VALIDATION
// ============================================================================

#[tokio::test]
async fn validation_failure_calls_no_remote_capability() {
    let (translator, classifier, judge) = happy_mocks();
    let app = spawn_app(translator, classifier, judge).await;
    let client = reqwest::Client::new();

    for body in [
        serde_json::json!({ "text": "" }),
        serde_json::json!({ "text": "   \t  " }),
    ] {
        let response = client
            .post(app.url("/ticket/evaluate"))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let error: serde_json::Value = response.json().await.unwrap();
        assert_eq!(error["error_stage"], "validation");
        assert_eq!(error["error"], "VALIDATION_FAILED");
        assert!(error.get("timestamp").is_some());
    }

    assert_eq!(app.translator.calls(), 0);
    assert_eq!(app.classifier.calls(), 0);
    assert_eq!(app.judge.calls(), 0);
}

#[tokio::test]
async fn oversized_text_is_rejected_before_any_remote_call() {
    let (translator, classifier, judge) = happy_mocks();
    let mut config = ApiConfig::default();
    config.max_text_length = 50;
    let app = spawn_app_with_config(translator, classifier, judge, config).await;

    let response = reqwest::Client::new()
        .post(app.url("/ticket/evaluate"))
        .json(&serde_json::json!({ "text": "x".repeat(51) }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["error_stage"], "validation");
    assert_eq!(app.translator.calls(), 0);
}

// ============================================================================
// SUCCESS PATH
// ============================================================================

#[tokio::test]
async fn outage_scenario_escalates_with_llm_reason() {
    let (translator, classifier, judge) = happy_mocks();
    let app = spawn_app(translator, classifier, judge).await;

    let response = reqwest::Client::new()
        .post(app.url("/ticket/evaluate"))
        .json(&serde_json::json!({
            "text": "Internet mati total dari pagi, rugi saya",
            "ticket_id": "T-100"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let result: serde_json::Value = response.json().await.unwrap();

    assert_eq!(result["ticket_id"], "T-100");
    assert_eq!(result["ml_urgency"], "high");
    assert_eq!(result["ml_priority"], "P1");
    assert_eq!(result["ml_auto_escalate"], true);
    assert!(result["ml_confidence"].as_f64().unwrap() >= 0.99);
    assert_eq!(result["llm_ml_valid"], true);
    assert_eq!(result["llm_recommended_action"], "escalate");
    // Both signals fire; the tie-break reports llm.
    assert_eq!(result["escalation_triggered"], true);
    assert_eq!(result["escalation_reason"], "llm");

    // Flat contract: no nested objects anywhere.
    for (field, value) in result.as_object().unwrap() {
        assert!(!value.is_object(), "field {} is a nested object", field);
    }

    // Timing invariants.
    let total = result["total_processing_time_ms"].as_u64().unwrap();
    for stage in ["translation_time_ms", "ml_time_ms", "llm_time_ms"] {
        assert!(total >= result[stage].as_u64().unwrap());
    }

    // The sink eventually lands the row plus keywords from the original text.
    assert!(wait_for_persistence(&app.store).await);
    let stored = app.store.results().await.pop().unwrap();
    assert_eq!(stored.ticket_id, "T-100");
    let keywords = app.store.keywords_for(stored.result_id).await;
    assert!(!keywords.is_empty());
    assert!(keywords.iter().all(|k| k.frequency > 0));
    // "dari" and "saya" are stopwords; they never appear.
    assert!(keywords
        .iter()
        .all(|k| !k.keyword.contains("dari") && !k.keyword.contains("saya")));
}

// ============================================================================
// DEPENDENCY FAILURES
// ============================================================================

#[tokio::test]
async fn translation_failure_maps_to_503_and_short_circuits() {
    let app = spawn_app(
        MockTranslationProvider::failing(TranslationError::EmptyTranslation),
        MockClassificationProvider::for_cluster(0, 0.5),
        MockJudgmentProvider::approving(RecommendedAction::Standard),
    )
    .await;

    let response = reqwest::Client::new()
        .post(app.url("/ticket/evaluate"))
        .json(&serde_json::json!({ "text": "internet mati" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["error_stage"], "translation");
    assert_eq!(error["error"], "TRANSLATION_FAILED");

    assert_eq!(app.classifier.calls(), 0);
    assert_eq!(app.judge.calls(), 0);

    // Nothing is persisted for failed runs.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.store.result_count().await, 0);
}

#[tokio::test]
async fn judgment_contract_violation_maps_to_503_gemini_stage() {
    let app = spawn_app(
        MockTranslationProvider::new("translated"),
        MockClassificationProvider::for_cluster(2, 0.7),
        MockJudgmentProvider::failing(JudgmentError::ContractViolation {
            field: "keywords".to_string(),
            reason: "expected 5-10 items, got 2".to_string(),
        }),
    )
    .await;

    let response = reqwest::Client::new()
        .post(app.url("/ticket/evaluate"))
        .json(&serde_json::json!({ "text": "internet lambat" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["error_stage"], "gemini");
    assert_eq!(error["error"], "JUDGMENT_FAILED");
}

// ============================================================================
// METHOD / PATH HANDLING
// ============================================================================

#[tokio::test]
async fn unsupported_method_gets_405() {
    let (translator, classifier, judge) = happy_mocks();
    let app = spawn_app(translator, classifier, judge).await;

    let response = reqwest::Client::new()
        .get(app.url("/ticket/evaluate"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn unknown_path_gets_404() {
    let (translator, classifier, judge) = happy_mocks();
    let app = spawn_app(translator, classifier, judge).await;

    let response = reqwest::Client::new()
        .post(app.url("/ticket/unknown"))
        .json(&serde_json::json!({ "text": "x" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

// ============================================================================
// SINK ISOLATION
// ============================================================================

#[tokio::test]
async fn datastore_failure_never_changes_the_response() {
    let (translator, classifier, judge) = happy_mocks();
    let app = spawn_app(translator, classifier, judge).await;
    app.store.fail_result_inserts(true);

    let response = reqwest::Client::new()
        .post(app.url("/ticket/evaluate"))
        .json(&serde_json::json!({ "text": "Internet mati total dari pagi" }))
        .send()
        .await
        .unwrap();

    // The caller-visible response is committed regardless of the sink.
    assert_eq!(response.status(), 200);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["escalation_triggered"], true);
    assert!(result.get("llm_customer_response").is_some());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.store.result_count().await, 0);
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn health_endpoints_respond() {
    let (translator, classifier, judge) = happy_mocks();
    let app = spawn_app(translator, classifier, judge).await;
    let client = reqwest::Client::new();

    let response = client.get(app.url("/health/ping")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "pong");

    let response = client.get(app.url("/health/live")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(app.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["details"]["version"].is_string());
}
