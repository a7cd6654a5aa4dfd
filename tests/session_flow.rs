use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use nutritrack::auth::dto::LoginRequest;
use nutritrack::error::Error;
use nutritrack::foodlog::query::{date_key, local_today};
use nutritrack::http::ApiTransport;
use nutritrack::Session;

/// Scripted transport: responses are queued per `METHOD path` key (plus
/// the `date` query parameter for food log fetches, so different days
/// can be scripted independently).
#[derive(Default)]
struct FakeApi {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, Error>>>>,
}

impl FakeApi {
    fn with(self, key: &str, value: Value) -> Self {
        self.push(key, Ok(value));
        self
    }

    fn with_err(self, key: &str, error: Error) -> Self {
        self.push(key, Err(error));
        self
    }

    fn push(&self, key: &str, response: Result<Value, Error>) {
        self.responses
            .lock()
            .expect("lock")
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    fn take(&self, key: &str) -> Result<Value, Error> {
        self.responses
            .lock()
            .expect("lock")
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(Error::Network(format!("no scripted response for {key}"))))
    }
}

fn get_key(path: &str, query: &[(&str, &str)]) -> String {
    match query.iter().find(|(name, _)| *name == "date") {
        Some((_, date)) => format!("GET {path}?date={date}"),
        None => format!("GET {path}"),
    }
}

#[async_trait]
impl ApiTransport for FakeApi {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error> {
        self.take(&get_key(path, query))
    }

    async fn post(&self, path: &str, _body: Value) -> Result<Value, Error> {
        self.take(&format!("POST {path}"))
    }
}

/// Transport that parks one chosen endpoint until the test releases it,
/// to pin a request in flight at a deterministic point.
struct GatedApi {
    inner: FakeApi,
    gated: String,
    entered: Notify,
    release: Notify,
}

impl GatedApi {
    fn new(gated: &str, inner: FakeApi) -> Self {
        Self {
            inner,
            gated: gated.to_string(),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    async fn hold(&self, key: &str) {
        if key.starts_with(&self.gated) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl ApiTransport for GatedApi {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error> {
        let key = get_key(path, query);
        self.hold(&key).await;
        self.inner.get(path, query).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, Error> {
        self.hold(&format!("POST {path}")).await;
        self.inner.post(path, body).await
    }
}

fn flat_auth(id: &str) -> Value {
    json!({
        "user": { "id": id, "name": "Ada", "email": "ada@example.com" },
        "token": "t0k3n"
    })
}

fn eggs() -> Value {
    json!({
        "_id": "log1",
        "user": "u1",
        "foodName": "Eggs",
        "calories": 140,
        "protein": 12,
        "carbs": 1,
        "fat": 10
    })
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "ada@example.com".into(),
        password: "hunter22".into(),
    }
}

async fn login(api: Arc<dyn ApiTransport>) -> Session {
    Session::login(api, &credentials()).await.expect("login")
}

#[tokio::test]
async fn analyzing_a_meal_returns_summary_and_grows_todays_totals() {
    let api = Arc::new(
        FakeApi::default()
            .with("POST /auth/login", flat_auth("u1"))
            .with("POST /ai/analyze", json!({ "foodLog": eggs() })),
    );
    let session = login(api).await;

    let summary = session.log_meal("2 eggs").await.expect("analyze");
    assert_eq!(
        summary,
        "Food: Eggs\nCalories: 140\nProtein: 12.0g\nCarbs: 1.0g\nFat: 10.0g"
    );

    let totals = session.current_totals().await.expect("totals for today");
    assert_eq!(totals.calories, 140.0);
    assert_eq!(totals.protein, 12.0);
    assert_eq!(totals.carbs, 1.0);
    assert_eq!(totals.fat, 10.0);
}

#[tokio::test]
async fn fetch_and_accumulate_paths_agree_on_todays_totals() {
    let today = date_key(local_today());
    let api = Arc::new(
        FakeApi::default()
            .with("POST /auth/login", flat_auth("u1"))
            .with(
                &format!("GET /foodlogs/date?date={today}"),
                json!([
                    { "_id": "a", "user": "u1", "foodName": "Rice",
                      "calories": 200, "protein": 10, "carbs": 20, "fat": 5 },
                    { "_id": "b", "user": "u1", "foodName": "Dal",
                      "calories": 150, "protein": 5, "carbs": 10, "fat": 3 }
                ]),
            )
            .with("POST /ai/analyze", json!({ "foodLog": eggs() })),
    );
    let session = login(api).await;

    let fetched = session
        .select_date(local_today())
        .await
        .expect("fetch")
        .expect("fresh totals");
    assert_eq!(fetched.calories, 350.0);
    assert_eq!(fetched.protein, 15.0);
    assert_eq!(fetched.carbs, 30.0);
    assert_eq!(fetched.fat, 8.0);

    session.log_meal("2 eggs").await.expect("analyze");

    let totals = session.current_totals().await.expect("totals");
    assert_eq!(totals.calories, 490.0);
    assert_eq!(totals.protein, 27.0);
    assert_eq!(totals.carbs, 31.0);
    assert_eq!(totals.fat, 18.0);
}

#[tokio::test]
async fn analyzer_message_without_record_is_passed_through() {
    let api = Arc::new(
        FakeApi::default()
            .with("POST /auth/login", flat_auth("u1"))
            .with(
                "POST /ai/analyze",
                json!({ "message": "That does not sound like food." }),
            ),
    );
    let session = login(api).await;

    let reply = session.log_meal("a pile of rocks").await.expect("analyze");
    assert_eq!(reply, "That does not sound like food.");
    assert!(
        session.current_totals().await.is_none(),
        "a recordless reply must not touch the store"
    );
}

#[tokio::test]
async fn analyzer_failure_surfaces_verbatim_and_mutates_nothing() {
    let api = Arc::new(
        FakeApi::default()
            .with("POST /auth/login", flat_auth("u1"))
            .with_err("POST /ai/analyze", Error::Remote("AI quota exceeded".into())),
    );
    let session = login(api).await;

    let err = session.log_meal("2 eggs").await.expect_err("must fail");
    assert_eq!(err.to_string(), "AI quota exceeded");
    assert!(session.current_totals().await.is_none());
}

#[tokio::test]
async fn empty_prompt_is_rejected_without_a_network_call() {
    let api = Arc::new(FakeApi::default().with("POST /auth/login", flat_auth("u1")));
    let session = login(api).await;

    let err = session.log_meal("   ").await.expect_err("must fail");
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn nested_auth_shape_normalizes_to_one_identity() {
    let api = Arc::new(FakeApi::default().with(
        "POST /auth/login",
        json!({
            "user": { "user": { "id": "u9", "name": "Grace" } },
            "token": "t0k3n"
        }),
    ));
    let session = login(api).await;
    assert_eq!(session.user().id, "u9");
    assert_eq!(session.user().name, "Grace");
}

#[tokio::test]
async fn failed_day_fetch_clears_totals_and_is_retryable() {
    let today = date_key(local_today());
    let key = format!("GET /foodlogs/date?date={today}");
    let api = Arc::new(
        FakeApi::default()
            .with("POST /auth/login", flat_auth("u1"))
            .with_err(&key, Error::Network("connection reset".into()))
            .with(&key, json!([eggs()])),
    );
    let session = login(api).await;

    let err = session
        .select_date(local_today())
        .await
        .expect_err("first fetch fails");
    assert!(err.is_retryable());
    assert!(session.current_totals().await.is_none());

    // Re-selecting the same date retries and recovers.
    let totals = session
        .select_date(local_today())
        .await
        .expect("retry")
        .expect("fresh totals");
    assert_eq!(totals.calories, 140.0);
}

#[tokio::test]
async fn goal_is_fetched_once_per_session() {
    let api = Arc::new(
        FakeApi::default()
            .with("POST /auth/login", flat_auth("u1"))
            .with(
                "GET /goal/user",
                json!({ "calories": 2000, "protein": 120, "carbs": 220, "fat": 60 }),
            ),
    );
    let session = login(api).await;

    let first = session.goal().await.expect("goal");
    assert_eq!(first.calories, 2000.0);
    // Only one response was scripted; a second network hit would fail.
    let second = session.goal().await.expect("cached goal");
    assert_eq!(second, first);
}

#[tokio::test]
async fn second_analysis_while_one_is_pending_is_rejected() {
    let inner = FakeApi::default()
        .with("POST /auth/login", flat_auth("u1"))
        .with("POST /ai/analyze", json!({ "foodLog": eggs() }));
    let api = Arc::new(GatedApi::new("POST /ai/analyze", inner));
    let session = Arc::new(login(api.clone() as Arc<dyn ApiTransport>).await);

    let background = tokio::spawn({
        let session = session.clone();
        async move { session.log_meal("2 eggs").await }
    });
    api.entered.notified().await;

    let err = session.log_meal("toast").await.expect_err("must be rejected");
    assert!(matches!(err, Error::AnalysisInFlight));

    api.release.notify_one();
    let summary = background
        .await
        .expect("join")
        .expect("first analysis completes");
    assert!(summary.starts_with("Food: Eggs"));
}

#[tokio::test]
async fn logging_is_rejected_while_todays_fetch_is_pending() {
    let today = date_key(local_today());
    let inner = FakeApi::default()
        .with("POST /auth/login", flat_auth("u1"))
        .with(&format!("GET /foodlogs/date?date={today}"), json!([]));
    let api = Arc::new(GatedApi::new("GET /foodlogs/date", inner));
    let session = Arc::new(login(api.clone() as Arc<dyn ApiTransport>).await);

    let background = tokio::spawn({
        let session = session.clone();
        let date = local_today();
        async move { session.select_date(date).await }
    });
    api.entered.notified().await;

    let err = session.log_meal("2 eggs").await.expect_err("must be rejected");
    assert!(matches!(err, Error::RefreshInFlight));

    api.release.notify_one();
    let totals = background
        .await
        .expect("join")
        .expect("fetch completes")
        .expect("fresh totals");
    assert_eq!(totals.calories, 0.0);
}
