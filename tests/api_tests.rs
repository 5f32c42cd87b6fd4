//! HTTP API integration tests
//!
//! Drives every JSON endpoint through the in-memory messenger backend.

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use chatcaster::api::services::{AppStartTime, MessengerBackendName, api_routes, frontend_routes};

use common::{CODE, OTHER_PHONE, PHONE, TestEnv, test_env};

macro_rules! init_app {
    ($env:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($env.context.sessions.clone()))
                .app_data(web::Data::new($env.context.chat_lists.clone()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .app_data(web::Data::new(MessengerBackendName(
                    $env.context.messenger_backend.clone(),
                )))
                .configure(api_routes)
                .configure(frontend_routes),
        )
        .await
    };
}

macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn auth_request(phone: &str, code: &str) -> TestRequest {
    TestRequest::post()
        .uri("/auth")
        .set_json(json!({ "phoneNumber": phone, "code": code }))
}

// =============================================================================
// Not connected
// =============================================================================

#[actix_rt::test]
async fn test_endpoints_require_session() {
    let env: TestEnv = test_env();
    let app = init_app!(env);

    for uri in ["/getCurrentUser", "/getChats", "/getChatsLists"] {
        let (status, body) = call_json!(app, TestRequest::get().uri(uri));
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body, json!({ "success": false, "error": "Not connected" }));
    }

    let (status, body) = call_json!(
        app,
        TestRequest::post()
            .uri("/sendMessages")
            .set_json(json!({ "chatsIds": [1], "message": "hi" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = call_json!(
        app,
        TestRequest::post()
            .uri("/createChatsList")
            .set_json(json!({ "name": "x", "chatsIds": [1] }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(env.messenger.sent_messages().is_empty());
}

// =============================================================================
// Authentication
// =============================================================================

#[actix_rt::test]
async fn test_auth_returns_first_name() {
    let env = test_env();
    let app = init_app!(env);

    let (status, body) = call_json!(app, auth_request(PHONE, CODE));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": { "firstName": "Alice" } }));

    let (status, body) = call_json!(app, TestRequest::get().uri("/getCurrentUser"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["firstName"], "Alice");
}

#[actix_rt::test]
async fn test_auth_with_wrong_code_fails() {
    let env = test_env();
    let app = init_app!(env);

    let (status, body) = call_json!(app, auth_request(PHONE, "00000"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("PHONE_CODE_INVALID"));

    let (status, _) = call_json!(app, TestRequest::get().uri("/getCurrentUser"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_auth_with_blank_fields_is_rejected() {
    let env = test_env();
    let app = init_app!(env);

    let (status, body) = call_json!(app, auth_request("  ", CODE));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(env.messenger.connect_count(), 0);
}

#[actix_rt::test]
async fn test_reauth_switches_user_and_logs_out_previous() {
    let env = test_env();
    let app = init_app!(env);

    call_json!(app, auth_request(PHONE, CODE));
    let (status, body) = call_json!(app, auth_request(OTHER_PHONE, CODE));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["firstName"], "Bob");
    assert_eq!(env.messenger.logged_out(), vec![PHONE.to_string()]);

    let (_, body) = call_json!(app, TestRequest::get().uri("/getChats"));
    assert_eq!(body["data"], json!([{ "id": 10, "title": "Neighbours" }]));
}

#[actix_rt::test]
async fn test_logout() {
    let env = test_env();
    let app = init_app!(env);

    call_json!(app, auth_request(PHONE, CODE));

    let (status, body) = call_json!(app, TestRequest::post().uri("/logout"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": { "loggedOut": true } }));

    let (_, body) = call_json!(app, TestRequest::post().uri("/logout"));
    assert_eq!(body["data"]["loggedOut"], false);

    let (status, _) = call_json!(app, TestRequest::get().uri("/getChats"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Chats
// =============================================================================

#[actix_rt::test]
async fn test_get_chats_in_messenger_order() {
    let env = test_env();
    let app = init_app!(env);
    call_json!(app, auth_request(PHONE, CODE));

    let (status, body) = call_json!(app, TestRequest::get().uri("/getChats"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "id": 1, "title": "Family" },
            { "id": 2, "title": "Work" },
            { "id": 3, "title": "Football" }
        ])
    );

    let (status, body) = call_json!(app, TestRequest::get().uri("/getChats?reload=true"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

// =============================================================================
// Sending
// =============================================================================

#[actix_rt::test]
async fn test_send_messages_reports_failures_and_unknown_ids() {
    let env = test_env();
    let app = init_app!(env);
    env.messenger.fail_chat(2);
    call_json!(app, auth_request(PHONE, CODE));

    let (status, body) = call_json!(
        app,
        TestRequest::post()
            .uri("/sendMessages")
            .set_json(json!({ "chatsIds": [3, 2, 1, 99], "message": "Hello" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["messagesSentCount"], 2);
    assert_eq!(body["data"]["sendErrors"][0]["chatId"], 2);
    assert!(
        body["data"]["sendErrors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("CHAT_WRITE_FORBIDDEN")
    );
    assert_eq!(body["data"]["unknownChatsIds"], json!([99]));

    // 按照聊天列表顺序发送，而不是请求顺序
    let delivered: Vec<i64> = env
        .messenger
        .sent_messages()
        .iter()
        .map(|m| m.chat_id)
        .collect();
    assert_eq!(delivered, vec![1, 3]);
    assert!(env.messenger.sent_messages().iter().all(|m| m.text == "Hello"));
}

#[actix_rt::test]
async fn test_send_messages_validation() {
    let env = test_env();
    let app = init_app!(env);
    call_json!(app, auth_request(PHONE, CODE));

    let (status, _) = call_json!(
        app,
        TestRequest::post()
            .uri("/sendMessages")
            .set_json(json!({ "chatsIds": [1], "message": "   " }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call_json!(
        app,
        TestRequest::post()
            .uri("/sendMessages")
            .set_json(json!({ "chatsIds": [], "message": "hi" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(env.messenger.sent_messages().is_empty());
}

#[actix_rt::test]
async fn test_malformed_json_returns_envelope() {
    let env = test_env();
    let app = init_app!(env);

    let (status, body) = call_json!(
        app,
        TestRequest::post()
            .uri("/auth")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

// =============================================================================
// Chat lists
// =============================================================================

#[actix_rt::test]
async fn test_create_and_get_chats_lists() {
    let env = test_env();
    let app = init_app!(env);
    call_json!(app, auth_request(PHONE, CODE));

    let (_, body) = call_json!(app, TestRequest::get().uri("/getChatsLists"));
    assert_eq!(body, json!({ "success": true, "data": [] }));

    let (status, body) = call_json!(
        app,
        TestRequest::post()
            .uri("/createChatsList")
            .set_json(json!({ "name": " Friends ", "chatsIds": [3, 1, 3] }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "name": "Friends", "chatsIds": [3, 1] }));

    call_json!(
        app,
        TestRequest::post()
            .uri("/createChatsList")
            .set_json(json!({ "name": "Work", "chatsIds": [2] }))
    );

    let (_, body) = call_json!(app, TestRequest::get().uri("/getChatsLists"));
    assert_eq!(
        body["data"],
        json!([
            { "name": "Friends", "chatsIds": [3, 1] },
            { "name": "Work", "chatsIds": [2] }
        ])
    );

    // 列表按手机号隔离
    call_json!(app, auth_request(OTHER_PHONE, CODE));
    let (_, body) = call_json!(app, TestRequest::get().uri("/getChatsLists"));
    assert_eq!(body["data"], json!([]));

    let saved = std::fs::read_to_string(env.dir.path().join("settings.json")).unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["chatsLists"][PHONE][1]["name"], "Work");
}

#[actix_rt::test]
async fn test_create_chats_list_rejects_blank_name() {
    let env = test_env();
    let app = init_app!(env);
    call_json!(app, auth_request(PHONE, CODE));

    let (status, body) = call_json!(
        app,
        TestRequest::post()
            .uri("/createChatsList")
            .set_json(json!({ "name": "  ", "chatsIds": [1] }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

// =============================================================================
// Health and frontend
// =============================================================================

#[actix_rt::test]
async fn test_health_reports_connection_state() {
    let env = test_env();
    let app = init_app!(env);

    let (status, body) = call_json!(app, TestRequest::get().uri("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["connected"], false);
    assert_eq!(body["data"]["messenger_backend"], "memory");

    call_json!(app, auth_request(PHONE, CODE));
    let (_, body) = call_json!(app, TestRequest::get().uri("/health"));
    assert_eq!(body["data"]["connected"], true);
}

#[actix_rt::test]
async fn test_frontend_is_served() {
    let env = test_env();
    let app = init_app!(env);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let resp = test::call_service(&app, TestRequest::get().uri("/app.js").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = call_json!(app, TestRequest::get().uri("/missing.txt"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "error": "File not found: missing.txt" })
    );
}
