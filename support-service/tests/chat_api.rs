//! Integration tests for the chat endpoint, run against the mock provider.

mod common;

use common::TestApp;
use serde_json::{json, Value};
use std::sync::Arc;
use support_service::services::providers::MockChatProvider;

async fn post_chat(app: &TestApp, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/chat", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn chat_returns_reply_and_direct_resources() {
    let app = TestApp::spawn().await;

    let response = post_chat(&app, json!({ "message": "I am hungry and have nowhere to go" })).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["severity"], "low");
    assert_eq!(body["resources"], json!([]));
    assert!(body["timestamp"].is_string());

    // Housing before food, both with generic names since no location came in.
    let records = body["locationResources"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "housing");
    assert_eq!(records[0]["name"], "Emergency Housing Services");
    assert!(records[0].get("directions").is_none());
    assert_eq!(records[1]["type"], "food");
    assert_eq!(records[1]["name"], "Food Assistance Services");
}

#[tokio::test]
async fn chat_caps_location_resources_at_three() {
    let app = TestApp::spawn().await;

    let response = post_chat(
        &app,
        json!({ "message": "I'm homeless, hungry, sick and unemployed" }),
    )
    .await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["locationResources"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn located_request_gets_city_flavored_records() {
    let app = TestApp::spawn().await;

    let response = post_chat(
        &app,
        json!({
            "message": "I'm homeless",
            "location": { "latitude": 40.72, "longitude": -74.04 }
        }),
    )
    .await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    let records = body["locationResources"].as_array().unwrap();
    assert_eq!(records.len(), 1);

    let name = records[0]["name"].as_str().unwrap();
    assert!(name.ends_with("Emergency Shelter"));
    assert_ne!(name, "Emergency Housing Services");
    assert!(records[0]["directions"]
        .as_str()
        .unwrap()
        .starts_with("https://maps.google.com/"));
}

#[tokio::test]
async fn high_severity_keyword_rates_high() {
    let app = TestApp::spawn().await;

    let response = post_chat(&app, json!({ "message": "I want to die" })).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["severity"], "high");
}

#[tokio::test]
async fn conversation_history_is_accepted() {
    let app = TestApp::spawn().await;

    let response = post_chat(
        &app,
        json!({
            "message": "still thinking about it",
            "conversation": [
                { "role": "user", "content": "work has been overwhelming" },
                { "role": "assistant", "content": "That sounds like a lot to carry." }
            ]
        }),
    )
    .await;

    assert!(response.status().is_success());
}

#[tokio::test]
async fn missing_message_field_is_rejected() {
    let app = TestApp::spawn().await;

    let response = post_chat(&app, json!({})).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = TestApp::spawn().await;

    let response = post_chat(&app, json!({ "message": "" })).await;
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn provider_failure_returns_the_fixed_fallback() {
    let app = TestApp::spawn_with_provider(Arc::new(MockChatProvider::failing())).await;

    let response = post_chat(&app, json!({ "message": "hello" })).await;
    assert_eq!(response.status().as_u16(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["severity"], "medium");
    assert_eq!(body["locationResources"], json!([]));

    let groups = body["resources"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["type"], "emergency");
    assert_eq!(groups[0]["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_resources_returns_the_fixed_samples() {
    let app = TestApp::spawn().await;

    let response = reqwest::Client::new()
        .get(format!("{}/test-resources", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    let records = body["locationResources"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "crisis");
    assert_eq!(records[0]["name"], "Test Crisis Center");
    assert_eq!(records[1]["type"], "therapy");
}
