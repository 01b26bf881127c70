//! Drives the full router in-process over the in-memory store.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use recipe_server::recipes::RecipeService;
use recipe_server::store::MemoryRecipeStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_app() -> Router {
    let service = RecipeService::new(Arc::new(MemoryRecipeStore::new()));
    recipe_server::app(Arc::new(service))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Body>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.unwrap_or_else(Body::empty))
        .expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body")
        .to_vec();
    TestResponse { status, body }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, None).await
}

pub async fn send_json(app: &Router, method: Method, uri: &str, payload: &Value) -> TestResponse {
    let body = Body::from(payload.to_string());
    send(app, method, uri, Some(body)).await
}

pub fn pizza() -> Value {
    serde_json::json!({
        "name": "Pizza",
        "description": "Put it in the oven",
        "ingredients": [{"name": "dough"}, {"name": "cheese"}, {"name": "tomato"}]
    })
}

/// Creates a recipe and returns its id.
pub async fn create(app: &Router, payload: &Value) -> i64 {
    let response = send_json(app, Method::POST, "/api/recipes", payload).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.json()["id"].as_i64().expect("id is a number")
}

pub fn ingredient_names(recipe: &Value) -> Vec<String> {
    recipe["ingredients"]
        .as_array()
        .expect("ingredients is a list")
        .iter()
        .map(|i| i["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
