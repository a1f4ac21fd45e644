use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use ragcore::persist::{save_records, CorpusPaths};
use ragcore::{Category, Document, RawDocument, Retriever};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_corpus(dir: &std::path::Path) {
    let paths = CorpusPaths::new(dir);
    save_records(
        &paths.bhc(),
        &[
            RawDocument { url: "https://bhcglobal.com/services".into(), headings: vec!["Services".into()], content: "services we offer".into() },
            RawDocument { url: "https://bhcglobal.com/careers".into(), headings: vec!["Careers".into()], content: "Join our team of engineers.".into() },
        ],
    )
    .unwrap();
    save_records(
        &paths.pcai(),
        &[RawDocument {
            url: "https://www.powerconnect.ai/about-us".into(),
            headings: vec!["About".into(), "Mission".into()],
            content: "PowerConnect.AI is our product".into(),
        }],
    )
    .unwrap();
}

fn app() -> Router {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    server::build_app(dir.path().to_string_lossy().to_string()).unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri).header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = call(app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, body) = call(app(), Request::get("/search?q=what%20is%20pcai&k=2").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["category"], "PCAI");
    assert_eq!(arr[0]["rank"], 1);
    assert_eq!(json["total_hits"], 1);
    assert!(arr[0]["snippet"].as_str().unwrap().starts_with("Source: PCAI — https://www.powerconnect.ai/about-us"));
}

#[tokio::test]
async fn search_k_is_clamped() {
    let (_, body) = call(app(), Request::get("/search?q=zzqqxx999&k=0").body(Body::empty()).unwrap()).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["url"], "https://bhcglobal.com/services");
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn chat_answers_pcai_with_single_link() {
    let payload = json!({ "messages": [
        { "role": "user", "content": "hello" },
        { "role": "assistant", "content": "Hi!" },
        { "role": "user", "content": "What is PCAI?" }
    ]});
    let (status, body) = call(app(), post_json("/chat", payload)).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["snippets"].as_array().unwrap().len(), 3);
    assert_eq!(
        json["text"],
        "POWERCONNECT.AI is our product\n\nLearn more: [POWERCONNECT.AI](https://www.POWERCONNECT.AI/about-us)"
    );
}

#[tokio::test]
async fn chat_filters_bhc_answers_by_intent() {
    let payload = json!({ "messages": [{ "role": "user", "content": "Is BHC hiring?" }] });
    let (status, body) = call(app(), post_json("/chat", payload)).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let text = json["text"].as_str().unwrap();
    assert!(text.starts_with("Here’s what I found about “Is BHC hiring?”:"));
    assert!(text.contains("https://bhcglobal.com/careers"));
    assert!(!text.contains("https://bhcglobal.com/services"));
}

#[tokio::test]
async fn chat_rejects_malformed_messages() {
    for payload in [json!({}), json!({ "messages": "hi" }), json!({ "messages": [{ "role": "user" }] })] {
        let (status, body) = call(app(), post_json("/chat", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Invalid payload"));
    }
}

#[tokio::test]
async fn search_k_upper_bound_is_100() {
    let corpus: Vec<Document> = (0..120)
        .map(|i| Document::new(format!("https://bhcglobal.com/page-{i}"), vec![], format!("grid page {i}"), Category::Bhc))
        .collect();
    let app = server::router_with_cors(Retriever::with_builtin_synonyms(corpus), server::cors_layer(None));
    let (status, body) = call(app, Request::get("/search?q=grid&k=1000").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["results"].as_array().unwrap().len(), 100);
    assert_eq!(json["total_hits"], 120);
    assert_eq!(json["results"][99]["rank"], 100);
}

fn origin_request(origin: &str) -> Request<Body> {
    Request::get("/health").header(header::ORIGIN, origin).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn cors_origin_list_only_allows_listed_origins() {
    let cors = || server::cors_layer(Some("https://bhcglobal.com, https://www.powerconnect.ai"));
    let retriever = Retriever::with_builtin_synonyms(Vec::new());

    let app = server::router_with_cors(retriever.clone(), cors());
    let resp = app.oneshot(origin_request("https://www.powerconnect.ai")).await.unwrap();
    assert_eq!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "https://www.powerconnect.ai");

    let app = server::router_with_cors(retriever, cors());
    let resp = app.oneshot(origin_request("https://evil.example")).await.unwrap();
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn cors_defaults_to_any_origin() {
    for allow in [None, Some(""), Some(" , ")] {
        let app = server::router_with_cors(Retriever::with_builtin_synonyms(Vec::new()), server::cors_layer(allow));
        let resp = app.oneshot(origin_request("https://anywhere.example")).await.unwrap();
        assert_eq!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
}

#[tokio::test]
async fn chat_stringifies_non_string_content() {
    let payload = json!({ "messages": [{ "role": "user", "content": 42 }] });
    let (status, body) = call(app(), post_json("/chat", payload)).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["snippets"].as_array().unwrap().len(), 3);

    let payload = json!({ "messages": [{ "role": "user", "content": [{ "type": "text", "text": "what is pcai" }] }] });
    let (status, _) = call(app(), post_json("/chat", payload)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn chat_rejects_falsy_content() {
    for content in [json!(""), json!(0), json!(false), Value::Null] {
        let payload = json!({ "messages": [{ "role": "user", "content": content }] });
        let (status, _) = call(app(), post_json("/chat", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
