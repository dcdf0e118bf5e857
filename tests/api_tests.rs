use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use movie_match::{
    error::{AppError, AppResult},
    models::MovieInfo,
    routes::{create_router, AppState},
    services::{providers::MetadataProvider, Catalog, MovieRecommender},
};

const CATALOG: &str = "\
id,title,genre,overview,vote_average
1,A,Sci-Fi,space war robots,7.1
2,B,Sci-Fi,space battle robots,6.8
3,C,Romance,romantic comedy wedding,5.9
4,Blank,,,0.0
";

/// Provider that knows two titles and fails for one
struct FakeProvider;

#[async_trait::async_trait]
impl MetadataProvider for FakeProvider {
    async fn fetch_movie_info(&self, title: &str) -> AppResult<Option<MovieInfo>> {
        match title {
            "B" | "Inception" => Ok(Some(MovieInfo {
                poster_url: Some(format!("https://images.test/{}.jpg", title)),
                overview: format!("About {}", title),
                rating: Some(8.0),
                year: "2010".to_string(),
            })),
            "C" | "Fight Club" => Err(AppError::ExternalApi("upstream down".to_string())),
            _ => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Provider that counts how many lookups it served
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl MetadataProvider for CountingProvider {
    async fn fetch_movie_info(&self, _title: &str) -> AppResult<Option<MovieInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

fn recommender() -> Arc<MovieRecommender> {
    let catalog = Catalog::from_reader(CATALOG.as_bytes()).unwrap();
    Arc::new(MovieRecommender::new(catalog, 0.6))
}

fn create_test_server(provider: Option<Arc<dyn MetadataProvider>>) -> TestServer {
    let mut state = AppState::new(recommender(), provider);
    state.featured_titles = vec![
        "Inception".to_string(),
        "Fight Club".to_string(),
        "Obscure".to_string(),
    ];
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

fn titles(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(None);
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommendations() {
    let server = create_test_server(None);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "a")
        .add_query_param("top_n", 2)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "a");
    assert_eq!(body["resolved_title"], "A");
    assert_eq!(titles(&body), vec!["B", "C"]);

    let first = body["recommendations"][0]["score"].as_f64().unwrap();
    let second = body["recommendations"][1]["score"].as_f64().unwrap();
    assert!(first > second);
}

#[tokio::test]
async fn test_recommendations_default_top_n() {
    let server = create_test_server(None);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Blank")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(titles(&body), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_recommendations_no_match() {
    let server = create_test_server(None);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "zzzxxqqxyz123")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["resolved_title"], Value::Null);
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_blank_title() {
    let server = create_test_server(None);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "   ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_detailed_recommendations_absorb_provider_failures() {
    let server = create_test_server(Some(Arc::new(FakeProvider)));

    let response = server
        .get("/api/v1/recommendations/detailed")
        .add_query_param("title", "A")
        .add_query_param("top_n", 3)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(titles(&body), vec!["B", "C", "Blank"]);

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs[0]["info"]["year"], "2010");
    assert_eq!(recs[1]["info"], Value::Null);
    assert_eq!(recs[2]["info"], Value::Null);
}

#[tokio::test]
async fn test_detailed_recommendations_without_provider() {
    let server = create_test_server(None);

    let response = server
        .get("/api/v1/recommendations/detailed")
        .add_query_param("title", "B")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|r| r["info"].is_null()));
}

#[tokio::test]
async fn test_oversized_top_n_is_clamped() {
    let provider = Arc::new(CountingProvider::default());
    let mut state = AppState::new(
        recommender(),
        Some(provider.clone() as Arc<dyn MetadataProvider>),
    );
    state.max_top_n = 2;
    let server = TestServer::new(create_router(Arc::new(state))).unwrap();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "A")
        .add_query_param("top_n", 10000)
        .await;
    response.assert_status_ok();
    assert_eq!(titles(&response.json()), vec!["B", "C"]);

    let response = server
        .get("/api/v1/recommendations/detailed")
        .add_query_param("title", "A")
        .add_query_param("top_n", 10000)
        .await;
    response.assert_status_ok();
    assert_eq!(titles(&response.json()), vec!["B", "C"]);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_featured() {
    let server = create_test_server(Some(Arc::new(FakeProvider)));

    let response = server.get("/api/v1/featured").await;
    response.assert_status_ok();

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["title"], "Inception");
    assert_eq!(body[0]["info"]["poster_url"], "https://images.test/Inception.jpg");
    assert_eq!(body[1]["info"], Value::Null);
    assert_eq!(body[2]["info"], Value::Null);
}

#[tokio::test]
async fn test_movie_info() {
    let server = create_test_server(Some(Arc::new(FakeProvider)));

    let response = server
        .get("/api/v1/movies/info")
        .add_query_param("title", "Inception")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["rating"], 8.0);

    server
        .get("/api/v1/movies/info")
        .add_query_param("title", "Obscure")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .get("/api/v1/movies/info")
        .add_query_param("title", "Fight Club")
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_movie_info_without_provider() {
    let server = create_test_server(None);

    server
        .get("/api/v1/movies/info")
        .add_query_param("title", "Inception")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_header() {
    let server = create_test_server(None);

    let response = server.get("/health").await;
    let header = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());

    let supplied = uuid::Uuid::new_v4().to_string();
    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_str(&supplied).unwrap(),
        )
        .await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), supplied.as_str());
}
