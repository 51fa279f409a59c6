use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();
    let app = server::app(engine);

    for name in ["alice", "bob", "mallory"] {
        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/v1/account",
            Some(name),
            Some(json!({ "email": format!("{name}@example.com"), "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    app
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    account: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(account) = account {
        builder = builder.header("x-account-id", account);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn dinner() -> Value {
    json!({
        "amount": "1.00",
        "timestamp": "2024-03-01T20:00:00+00:00",
        "splitType": "equal",
        "participants": [{ "id": "alice" }, { "id": "bob", "fractionalShare": 1 }, { "id": "alice" }],
    })
}

async fn create(app: &Router, actor: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::PUT, "/api/v1/transaction", Some(actor), Some(body)).await
}

#[tokio::test]
async fn missing_principal_is_unauthorized() {
    let app = test_app().await;
    let (status, _) = call(&app, Method::GET, "/api/v1/transactions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::GET, "/api/v1/transactions", Some("  "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_round_trip() {
    let app = test_app().await;
    let (status, body) = call(&app, Method::GET, "/api/v1/account", Some("bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bob@example.com");

    let (status, _) = call(&app, Method::GET, "/api/v1/account", Some("zoe"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_then_read_back_decimal_shares() {
    let app = test_app().await;
    let body = json!({
        "amount": "1.00",
        "timestamp": "2024-03-01T20:00:00+00:00",
        "splitType": "equal",
        "participants": [{ "id": "alice" }, { "id": "bob", "fractionalShare": 1 }, { "id": "mallory" }],
    });
    let (status, created) = create(&app, "alice", body).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, tx) = call(
        &app,
        Method::GET,
        &format!("/api/v1/transaction/{id}"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["amount"], "1.00");
    assert_eq!(tx["payer"], "alice");
    assert_eq!(tx["splitType"], "equal");
    let shares: Vec<&str> = tx["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["dollarShare"].as_str().unwrap())
        .collect();
    assert_eq!(shares, vec!["0.34", "0.33", "0.33"]);
    assert_eq!(tx["participants"][1]["fractionalShare"], 1);
    assert_eq!(tx["participants"][1]["name"], "bob");
    assert_eq!(tx["participants"][1]["email"], "bob@example.com");
    assert_eq!(tx["participants"][2]["name"], "mallory");

    let (status, list) = call(&app, Method::GET, "/api/v1/transactions", Some("mallory"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_rejects_bad_input() {
    let app = test_app().await;

    let mut body = dinner();
    body["splitType"] = json!("percent");
    let (status, err) = create(&app, "alice", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(err["error"].as_str().unwrap().contains("percent"));

    let mut body = dinner();
    body["amount"] = json!("1.005");
    let (status, _) = create(&app, "alice", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut body = dinner();
    body["participants"] = json!([]);
    let (status, _) = create(&app, "alice", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut body = dinner();
    body["participants"] = json!([{ "id": "alice" }, { "id": "zoe" }]);
    let (status, _) = create(&app, "alice", body).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // alice listed twice
    let (status, _) = create(&app, "alice", dinner()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, list) = call(&app, Method::GET, "/api/v1/transactions", Some("alice"), None).await;
    assert!(list["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn outsider_cannot_record_for_others() {
    let app = test_app().await;
    let mut body = dinner();
    body["payer"] = json!("alice");
    body["participants"] = json!([{ "id": "alice" }, { "id": "bob" }]);

    let (status, _) = create(&app, "mallory", body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_requires_party() {
    let app = test_app().await;
    let mut body = dinner();
    body["participants"] = json!([{ "id": "alice" }, { "id": "bob" }]);
    let (_, created) = create(&app, "alice", body).await;
    let uri = format!("/api/v1/transaction/{}", created["id"].as_str().unwrap());

    let (status, _) = call(&app, Method::DELETE, &uri, Some("mallory"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::DELETE, &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_replaces_payer_and_timestamp() {
    let app = test_app().await;
    let mut body = dinner();
    body["participants"] = json!([{ "id": "alice" }, { "id": "bob" }]);
    let (_, created) = create(&app, "alice", body).await;
    let uri = format!("/api/v1/transaction/{}", created["id"].as_str().unwrap());

    let (status, _) = call(
        &app,
        Method::PATCH,
        &uri,
        Some("bob"),
        Some(json!({ "payer": "bob", "timestamp": "2024-03-02T08:30:00+00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, tx) = call(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(tx["payer"], "bob");
    assert_eq!(tx["amount"], "1.00");

    let (status, _) = call(
        &app,
        Method::PATCH,
        &uri,
        Some("mallory"),
        Some(json!({ "payer": "mallory", "timestamp": "2024-03-02T08:30:00+00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn caller_matches_padded_payer() {
    let app = test_app().await;
    let mut body = dinner();
    body["payer"] = json!(" alice");
    body["participants"] = json!([{ "id": "bob" }]);

    let (status, created) = create(&app, "alice", body).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/v1/transaction/{}", created["id"].as_str().unwrap());
    let (_, tx) = call(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(tx["payer"], "alice");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = test_app().await;

    let mut body = dinner();
    body["amount"] = json!(1.00);
    let (status, err) = create(&app, "alice", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());

    let (status, err) = call(
        &app,
        Method::PUT,
        "/api/v1/account",
        Some("alice"),
        Some(json!({ "name": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());
}
