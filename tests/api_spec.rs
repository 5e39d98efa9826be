mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{oracle_with, GatedProvider, Reply, ScriptedProvider};
use tianji::api::{create_router, AppState};
use tianji::oracle::{FALLBACK_TEXT, OBSTRUCTED_MESSAGE};
use tianji::provider::TextProvider;

fn setup(provider: Arc<dyn TextProvider>) -> TestServer {
    let app = create_router(AppState::new(oracle_with(provider)));
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_session(server: &TestServer) -> String {
    let response = server.post("/api/v1/sessions").await;
    response.assert_status(StatusCode::CREATED);
    let session: Value = response.json();
    session["id"].as_str().expect("session id").to_string()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup(ScriptedProvider::text("unused"));

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod zodiac {
    use super::*;

    #[tokio::test]
    async fn returns_sign_for_year() {
        let server = setup(ScriptedProvider::text("unused"));

        let response = server.get("/api/v1/zodiac/2026").await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "year": 2026,
            "index": 6,
            "label": "马",
            "english_name": "Horse"
        }));
    }

    #[tokio::test]
    async fn handles_years_before_the_epoch() {
        let server = setup(ScriptedProvider::text("unused"));

        let body: Value = server.get("/api/v1/zodiac/1923").await.json();

        assert_eq!(body["label"], "猪");
        assert_eq!(body["index"], 11);
    }

    #[tokio::test]
    async fn rejects_non_numeric_year() {
        let server = setup(ScriptedProvider::text("unused"));

        let response = server.get("/api/v1/zodiac/horse").expect_failure().await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

mod sessions {
    use super::*;

    #[tokio::test]
    async fn new_session_is_idle() {
        let server = setup(ScriptedProvider::text("unused"));
        let id = create_session(&server).await;

        let session: Value = server.get(&format!("/api/v1/sessions/{}", id)).await.json();

        assert_eq!(session["state"], "idle");
        assert!(session["input"].is_null());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let server = setup(ScriptedProvider::text("unused"));

        let response = server
            .get(&format!("/api/v1/sessions/{}", uuid::Uuid::new_v4()))
            .expect_failure()
            .await;

        response.assert_status_not_found();
    }
}

mod divine {
    use super::*;

    #[tokio::test]
    async fn settles_in_success_with_reading() {
        let provider = ScriptedProvider::text("此乃骏马奔腾之象。");
        let server = setup(provider.clone());
        let id = create_session(&server).await;

        let response = server
            .post(&format!("/api/v1/sessions/{}/divine", id))
            .json(&json!({ "birthday": "1990-05-01", "direction": "wealth" }))
            .await;

        response.assert_status_ok();
        let session: Value = response.json();
        assert_eq!(session["state"], "success");
        assert_eq!(session["result"]["content"], "此乃骏马奔腾之象。");
        assert_eq!(session["result"]["zodiac"], "马");
        assert_eq!(session["input"]["direction"], "wealth");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn provider_failure_settles_in_error() {
        let provider = ScriptedProvider::new(Reply::Rejected(401, "bad key".to_string()));
        let server = setup(provider);
        let id = create_session(&server).await;

        let response = server
            .post(&format!("/api/v1/sessions/{}/divine", id))
            .json(&json!({ "birthday": "1990-05-01", "direction": "career" }))
            .await;

        response.assert_status_ok();
        let session: Value = response.json();
        assert_eq!(session["state"], "error");
        assert_eq!(session["message"], OBSTRUCTED_MESSAGE);
        assert!(session.get("result").is_none());
        assert!(!response.text().contains("bad key"));
    }

    #[tokio::test]
    async fn empty_text_settles_in_success_with_fallback() {
        let server = setup(ScriptedProvider::new(Reply::Text(None)));
        let id = create_session(&server).await;

        let session: Value = server
            .post(&format!("/api/v1/sessions/{}/divine", id))
            .json(&json!({ "birthday": "1990-05-01" }))
            .await
            .json();

        assert_eq!(session["state"], "success");
        assert_eq!(session["result"]["content"], FALLBACK_TEXT);
    }

    #[tokio::test]
    async fn empty_birthday_is_rejected_without_calling_provider() {
        let provider = ScriptedProvider::text("unused");
        let server = setup(provider.clone());
        let id = create_session(&server).await;

        let response = server
            .post(&format!("/api/v1/sessions/{}/divine", id))
            .json(&json!({ "birthday": "", "direction": "career" }))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        assert_eq!(provider.calls(), 0);
        let session: Value = server.get(&format!("/api/v1/sessions/{}", id)).await.json();
        assert_eq!(session["state"], "idle");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let provider = ScriptedProvider::text("unused");
        let server = setup(provider.clone());

        let response = server
            .post(&format!("/api/v1/sessions/{}/divine", uuid::Uuid::new_v4()))
            .json(&json!({ "birthday": "1990-05-01" }))
            .expect_failure()
            .await;

        response.assert_status_not_found();
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn second_submit_while_loading_is_conflict() {
        let provider = GatedProvider::new("此乃吉象。");
        let state = AppState::new(oracle_with(provider.clone()));
        let app = create_router(state.clone());
        let id = state.sessions.create().id();

        let submit = |birthday: &str| {
            Request::post(format!("/api/v1/sessions/{}/divine", id))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "birthday": birthday }).to_string()))
                .unwrap()
        };

        let first = tokio::spawn(app.clone().oneshot(submit("1990-05-01")));
        provider.entered.notified().await;

        let second = app.clone().oneshot(submit("2001-01-01")).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let in_flight = state.sessions.get(id).unwrap();
        assert_eq!(in_flight.input().unwrap().birthday, "1990-05-01");

        provider.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(first.into_body(), usize::MAX).await.unwrap();
        let session: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(session["state"], "success");
        assert_eq!(session["input"]["birthday"], "1990-05-01");
    }
}

mod disconnect {
    use super::*;
    use std::time::Duration;
    use tianji::models::LoadingState;

    #[tokio::test]
    async fn reading_settles_after_client_drops_request() {
        let provider = GatedProvider::new("此乃吉象。");
        let state = AppState::new(oracle_with(provider.clone()));
        let app = create_router(state.clone());
        let id = state.sessions.create().id();

        let request = Request::post(format!("/api/v1/sessions/{}/divine", id))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "birthday": "1990-05-01" }).to_string()))
            .unwrap();
        let in_flight = tokio::spawn(app.clone().oneshot(request));
        provider.entered.notified().await;

        in_flight.abort();
        let _ = in_flight.await;
        provider.release.notify_one();

        let mut settled = None;
        for _ in 0..100 {
            let session = state.sessions.get(id).unwrap();
            if session.state() != LoadingState::Loading {
                settled = Some(session);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let settled = settled.expect("session still loading after disconnect");
        assert_eq!(settled.state(), LoadingState::Success);
        assert_eq!(settled.result().unwrap().content, "此乃吉象。");

        let server = TestServer::new(app).expect("Failed to create test server");
        server
            .post(&format!("/api/v1/sessions/{}/reset", id))
            .await
            .assert_status_ok();
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn removes_settled_session() {
        let server = setup(ScriptedProvider::text("此乃吉象。"));
        let id = create_session(&server).await;
        server
            .post(&format!("/api/v1/sessions/{}/divine", id))
            .json(&json!({ "birthday": "1990-05-01" }))
            .await
            .assert_status_ok();

        let response = server.delete(&format!("/api/v1/sessions/{}", id)).await;

        response.assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/sessions/{}", id))
            .expect_failure()
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let server = setup(ScriptedProvider::text("unused"));

        let response = server
            .delete(&format!("/api/v1/sessions/{}", uuid::Uuid::new_v4()))
            .expect_failure()
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn refused_while_loading() {
        let provider = GatedProvider::new("此乃吉象。");
        let state = AppState::new(oracle_with(provider.clone()));
        let app = create_router(state.clone());
        let id = state.sessions.create().id();

        let submit = Request::post(format!("/api/v1/sessions/{}/divine", id))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "birthday": "1990-05-01" }).to_string()))
            .unwrap();
        let first = tokio::spawn(app.clone().oneshot(submit));
        provider.entered.notified().await;

        let delete = Request::delete(format!("/api/v1/sessions/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(state.sessions.get(id).is_some());

        provider.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert!(state.sessions.remove(id).is_ok());
        assert!(state.sessions.get(id).is_none());
    }
}

mod reset {
    use super::*;

    #[tokio::test]
    async fn returns_to_idle_after_reading() {
        let server = setup(ScriptedProvider::text("此乃吉象。"));
        let id = create_session(&server).await;
        server
            .post(&format!("/api/v1/sessions/{}/divine", id))
            .json(&json!({ "birthday": "1990-05-01" }))
            .await
            .assert_status_ok();

        let response = server.post(&format!("/api/v1/sessions/{}/reset", id)).await;

        response.assert_status_ok();
        let session: Value = response.json();
        assert_eq!(session["state"], "idle");
        assert!(session.get("result").is_none());
        assert!(session["input"].is_null());
    }
}

mod scroll {
    use super::*;

    #[tokio::test]
    async fn renders_card_for_finished_reading() {
        let server = setup(ScriptedProvider::text("此乃骏马奔腾之象。"));
        let id = create_session(&server).await;
        server
            .post(&format!("/api/v1/sessions/{}/divine", id))
            .json(&json!({ "birthday": "1990-05-01", "direction": "relationship" }))
            .await
            .assert_status_ok();

        let response = server.get(&format!("/api/v1/sessions/{}/scroll", id)).await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("马属相 · 丙午年运势"));
        assert!(text.contains("所求：感情"));
        assert!(text.contains("此乃骏马奔腾之象。"));
    }

    #[tokio::test]
    async fn conflict_without_reading() {
        let server = setup(ScriptedProvider::text("unused"));
        let id = create_session(&server).await;

        let response = server
            .get(&format!("/api/v1/sessions/{}/scroll", id))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }
}
