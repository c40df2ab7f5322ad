//! Journal CRUD, ownership scoping and mood analytics.

mod common;

use axum::http::StatusCode;
use common::{sample_entry, TestApp};
use serde_json::json;

#[tokio::test]
async fn entry_lifecycle() {
    let app = TestApp::new();
    let (token, user_id) = app.register("Ann", "ann@x.com", "secret1").await;

    let (status, created) = app.post("/api/journal", &token, sample_entry()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["tags"], json!(["win"]));
    assert_eq!(created["moodScore"], 8);
    assert_eq!(created["userId"], user_id);
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/journal/{}", id);

    let (status, updated) = app
        .put(
            &uri,
            &token,
            json!({ "mood": "sad", "title": "Day 1", "content": "Not so good", "tags": ["rain"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["mood"], "sad");
    assert_eq!(updated["content"], "Not so good");
    assert_eq!(updated["tags"], json!(["rain"]));
    // Full replace: the omitted score is cleared.
    assert_eq!(updated["moodScore"], serde_json::Value::Null);

    let (status, fetched) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["mood"], "sad");

    let (status, body) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Entry deleted successfully");

    let (status, _) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tags_round_trip_in_order() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;

    let mut entry = sample_entry();
    entry["tags"] = json!(["work", "sleep"]);
    let (_, created) = app.post("/api/journal", &token, entry).await;

    let uri = format!("/api/journal/{}", created["id"]);
    let (_, fetched) = app.get(&uri, &token).await;
    assert_eq!(fetched["tags"], json!(["work", "sleep"]));

    let (_, listed) = app.get("/api/journal", &token).await;
    assert_eq!(listed[0]["tags"], json!(["work", "sleep"]));
}

#[tokio::test]
async fn string_encoded_tags_are_normalized() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;

    let mut entry = sample_entry();
    entry["tags"] = json!("work, sleep");
    let (status, created) = app.post("/api/journal", &token, entry).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["tags"], json!(["work", "sleep"]));

    let mut entry = sample_entry();
    entry["tags"] = json!("[\"a\",\"b\"]");
    let (_, created) = app.post("/api/journal", &token, entry).await;
    assert_eq!(created["tags"], json!(["a", "b"]));
}

#[tokio::test]
async fn other_users_cannot_touch_an_entry() {
    let app = TestApp::new();
    let (ann, _) = app.register("Ann", "ann@x.com", "secret1").await;
    let (bob, _) = app.register("Bob", "bob@x.com", "secret2").await;

    let (_, created) = app.post("/api/journal", &ann, sample_entry()).await;
    let uri = format!("/api/journal/{}", created["id"]);

    let (status, body) = app.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Entry not found");

    let mut hijack = sample_entry();
    hijack["title"] = json!("mine now");
    let (status, _) = app.put(&uri, &bob, hijack).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bob_list) = app.get("/api/journal", &bob).await;
    assert_eq!(bob_list, json!([]));

    let (status, unchanged) = app.get(&uri, &ann).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn client_supplied_owner_is_ignored() {
    let app = TestApp::new();
    let (ann, ann_id) = app.register("Ann", "ann@x.com", "secret1").await;
    let (_, bob_id) = app.register("Bob", "bob@x.com", "secret2").await;

    let mut entry = sample_entry();
    entry["userId"] = json!(bob_id);
    let (_, created) = app.post("/api/journal", &ann, entry).await;
    assert_eq!(created["userId"], ann_id);
}

#[tokio::test]
async fn repeated_delete_is_not_found() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;
    let (_, created) = app.post("/api/journal", &token, sample_entry()).await;
    let uri = format!("/api/journal/{}", created["id"]);

    assert_eq!(app.delete(&uri, &token).await.0, StatusCode::OK);
    assert_eq!(app.delete(&uri, &token).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&uri, &token).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;

    assert_eq!(app.get("/api/journal/424242", &token).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/journal/abc", &token).await.0, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put("/api/journal/424242", &token, sample_entry()).await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;

    let (status, body) = app
        .post("/api/journal", &token, json!({ "mood": "happy", "title": "t" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("content"));

    let (status, _) = app
        .post("/api/journal", &token, json!({ "mood": 3, "title": "t", "content": "c" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = app.get("/api/journal", &token).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;

    for title in ["first", "second", "third"] {
        let mut entry = sample_entry();
        entry["title"] = json!(title);
        app.post("/api/journal", &token, entry).await;
    }

    let (_, listed) = app.get("/api/journal", &token).await;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["third", "second", "first"]);
}

#[tokio::test]
async fn mood_trends_group_by_day_and_mood() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;
    let (other, _) = app.register("Bob", "bob@x.com", "secret2").await;

    for (mood, score) in [("happy", 8), ("happy", 6), ("sad", 2)] {
        let mut entry = sample_entry();
        entry["mood"] = json!(mood);
        entry["moodScore"] = json!(score);
        app.post("/api/journal", &token, entry).await;
    }
    app.post("/api/journal", &other, sample_entry()).await;

    let (status, trends) = app.get("/api/journal/analytics/mood-trends", &token).await;
    assert_eq!(status, StatusCode::OK);
    let trends = trends.as_array().unwrap();
    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0]["mood"], "happy");
    assert_eq!(trends[0]["count"], 2);
    assert_eq!(trends[0]["avgScore"], 7.0);
    assert_eq!(trends[1]["mood"], "sad");
    assert_eq!(trends[1]["count"], 1);
    assert!(trends[0]["date"].as_str().is_some());
}
