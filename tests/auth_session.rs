use cinema_rs_client::types::{Role, SignupRequest};
use cinema_rs_client::{spawn_keep_alive, ApiClient, AuthSession, ClientConfig, ClientError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_for(server: &MockServer) -> AuthSession {
    let client = ApiClient::new(ClientConfig::new(server.uri(), "http://backend.test:8000")).unwrap();
    AuthSession::new(client)
}

fn user_json(id: i64) -> serde_json::Value {
    json!({ "id": id, "email": "ada@example.com", "name": "Ada", "role": "USER" })
}

#[tokio::test]
async fn login_stores_token_for_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter2" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "tok1", "user": user_json(1) })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .and(header("Authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let user = session.login("ada@example.com", "hunter2").await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.role, Role::User);
    assert!(session.is_authenticated());
    assert_eq!(session.client().token_store().get().as_deref(), Some("tok1"));
    assert_eq!(session.user(), Some(user));

    session.client().movies().await.unwrap();
}

#[tokio::test]
async fn bad_credentials_do_not_trigger_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = session.login("ada@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, ClientError::Api { .. }));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn signup_signs_the_new_account_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "hunter2",
            "name": "Ada",
            "phoneNumber": "555-0100"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "accessToken": "tok2", "user": user_json(2) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let user = session
        .signup(&SignupRequest {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
            name: "Ada".to_string(),
            phone_number: "555-0100".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, 2);
    assert_eq!(session.client().token_store().get().as_deref(), Some("tok2"));
}

#[tokio::test]
async fn logout_clears_state_even_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("Authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let client = session.client().clone();
    let published = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = std::sync::Arc::clone(&published);
    client.error_bus().subscribe(move |_| {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    });
    client.set_access_token(Some("tok1".to_string()));

    session.logout().await;

    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert_eq!(published.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn refresh_with_profile_updates_session_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "tok3", "user": user_json(3) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let token = session.client().refresh_access_token().await.unwrap();

    assert_eq!(token, "tok3");
    assert_eq!(session.user().map(|u| u.id), Some(3));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn keep_alive_pings_health_until_aborted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(2..)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "http://backend.test:8000")
        .with_keep_alive_interval(Duration::from_millis(50));
    let client = ApiClient::new(config).unwrap();
    let handle = spawn_keep_alive(client.clone(), client.config().keep_alive_interval);

    tokio::time::sleep(Duration::from_millis(180)).await;
    handle.abort();
    let _ = handle.await;

    server.verify().await;
}
