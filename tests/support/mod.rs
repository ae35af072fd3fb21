// Servidor de teste: app completo sobre o MemoryStore, numa porta livre.

#![allow(dead_code)]

use std::sync::Arc;

use barber_crm::{
    config::AppState,
    db::{MemoryStore, UserStore},
    services::auth::AuthConfig,
};
use chrono::Duration;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-secret".into(),
        access_ttl: Duration::minutes(5),
        refresh_ttl: Duration::days(1),
        bcrypt_cost: 4,
    }
}

pub struct TestApp {
    pub base: String,
    pub http: reqwest::Client,
    pub store: Arc<MemoryStore>,
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_store(store.clone(), auth_config());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, barber_crm::app(state))
            .await
            .expect("serve app")
    });

    TestApp {
        base: format!("http://{addr}"),
        http: reqwest::Client::new(),
        store,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn register(&self, username: &str) -> TestUser {
        let (status, body) = self
            .send(
                reqwest::Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "securepassword123",
                    "password2": "securepassword123",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
        TestUser {
            id: body["user"]["id"].as_i64().expect("user id"),
            token: body["access"].as_str().expect("access token").to_string(),
        }
    }

    pub async fn register_master(&self, username: &str) -> TestUser {
        let user = self.register(username).await;
        self.store
            .set_master(user.id, true)
            .await
            .expect("promote master");
        user
    }

    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.expect("send request");
        let status = response.status();
        let bytes = response.bytes().await.expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(reqwest::Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.send(reqwest::Method::DELETE, path, Some(token), None).await
    }

    /// Cria uma barbearia e devolve o id.
    pub async fn business(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/businesses", token, json!({ "name": name, "phone": "555-0100" }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().expect("business id").to_string()
    }
}
