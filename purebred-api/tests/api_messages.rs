//! Messaging guard: only the two owners of a match may post to it.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{error_code, TestApp};
use purebred_api::config::AppConfig;

struct Matched {
    match_id: String,
    o1: String,
    p1: String,
    o2: String,
    p2: String,
}

async fn matched_pair(app: &TestApp) -> Matched {
    let o1 = app.owner("Alice").await;
    let o2 = app.owner("Bruno").await;
    let p1 = app.pet(&o1, "dog", "Rex").await;
    let p2 = app.pet(&o2, "dog", "Luna").await;

    app.swipe(&p1, &p2, "like", &o1).await;
    let (_, body) = app.swipe(&p2, &p1, "like", &o2).await;
    let match_id = body["match_id"].as_str().expect("pair did not match").to_string();

    Matched { match_id, o1, p1, o2, p2 }
}

fn message(match_id: &str, pet: &str, owner: &str, text: &str) -> Value {
    json!({
        "match_id": match_id,
        "sender_pet_id": pet,
        "sender_owner_id": owner,
        "text": text,
    })
}

#[tokio::test]
async fn participant_can_send_and_outsider_is_forbidden() {
    let app = TestApp::new();
    let m = matched_pair(&app).await;

    let (status, body) = app
        .post("/messages", message(&m.match_id, &m.p1, &m.o1, "Hello!"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].is_string());

    let o3 = app.owner("Chloe").await;
    let (status, body) = app
        .post("/messages", message(&m.match_id, &m.p1, &o3, "Let me in"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "E3001");

    let (_, history) = app.get(&format!("/messages/{}", m.match_id)).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_match_is_not_found() {
    let app = TestApp::new();
    let o1 = app.owner("Alice").await;
    let p1 = app.pet(&o1, "dog", "Rex").await;

    let (status, body) = app
        .post(
            "/messages",
            message("0190a8b4-0000-7000-8000-0000000000ff", &p1, &o1, "anyone?"),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "E2002");
}

#[tokio::test]
async fn history_is_oldest_first() {
    let app = TestApp::new();
    let m = matched_pair(&app).await;

    for (pet, owner, text) in [
        (&m.p1, &m.o1, "first"),
        (&m.p2, &m.o2, "second"),
        (&m.p1, &m.o1, "third"),
    ] {
        let (status, _) = app.post("/messages", message(&m.match_id, pet, owner, text)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, history) = app.get(&format!("/messages/{}", m.match_id)).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|msg| msg["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["first", "second", "third"]);
    assert_eq!(history[1]["sender_owner_id"], m.o2.as_str());
}

#[tokio::test]
async fn history_is_capped_by_conversation_limit() {
    let app = TestApp::with_config(AppConfig {
        conversation_limit: 2,
        ..AppConfig::default()
    });
    let m = matched_pair(&app).await;

    for text in ["one", "two", "three"] {
        let (status, _) = app.post("/messages", message(&m.match_id, &m.p1, &m.o1, text)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, history) = app.get(&format!("/messages/{}", m.match_id)).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|msg| msg["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["one", "two"]);
}

#[tokio::test]
async fn history_of_unknown_match_is_empty() {
    let app = TestApp::new();
    let (status, history) = app
        .get("/messages/0190a8b4-0000-7000-8000-0000000000aa")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn malformed_match_id_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.get("/messages/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "E0004");
}
