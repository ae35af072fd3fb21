// src/client/http.rs
//
// Implementação do BarberApi sobre reqwest. Cuida só de transporte:
// URL, Bearer, timeout, mapeamento de status e decodificação.

use std::{collections::BTreeMap, sync::RwLock, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    client::{api::BarberApi, error::ClientError},
    common::pagination::Paginated,
    models::{
        appointment::{Appointment, AppointmentChanges, AppointmentPayload, AppointmentStatus},
        auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, UserSummary},
        business::Business,
        customer::{Customer, CustomerPayload},
        service::{Service, ServicePayload},
        staff::{Staff, StaffPayload},
    },
};

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Por requisição. Estourar conta como erro de rede (e desfaz a mutação).
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// A API pode responder array puro ou o envelope paginado
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Page(Paginated<T>),
}

impl<T> ListBody<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) => items,
            ListBody::Page(page) => page.results,
        }
    }
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: BTreeMap<String, Vec<String>>,
}

pub struct HttpApi {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    /// # Errors
    ///
    /// Falha se o cliente reqwest não puder ser montado.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json");
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError> {
        let response = self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn list<T: DeserializeOwned>(&self, path: &str, business: Uuid) -> Result<Vec<T>, ClientError> {
        let body: ListBody<T> = self.get(path, &[("business", business.to_string())]).await?;
        Ok(body.into_items())
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, path)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    serde_json::from_slice(body.as_ref())
        .map_err(|e| ClientError::Transport(format!("invalid response body: {e}")))
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Transport("request timed out".to_string())
    } else {
        ClientError::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = if parsed.error.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        parsed.error
    };

    match status {
        StatusCode::BAD_REQUEST => ClientError::Validation {
            message,
            fields: parsed.details,
        },
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound,
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl BarberApi for HttpApi {
    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    async fn login(&self, payload: &LoginUserPayload) -> Result<AuthResponse, ClientError> {
        self.send(Method::POST, "auth/login", payload).await
    }

    async fn register(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, ClientError> {
        self.send(Method::POST, "auth/register", payload).await
    }

    async fn me(&self) -> Result<UserSummary, ClientError> {
        self.get("auth/me", &[]).await
    }

    async fn list_businesses(&self) -> Result<Vec<Business>, ClientError> {
        let body: ListBody<Business> = self.get("businesses", &[]).await?;
        Ok(body.into_items())
    }

    async fn list_customers(&self, business: Uuid) -> Result<Vec<Customer>, ClientError> {
        self.list("customers", business).await
    }

    async fn create_customer(&self, payload: &CustomerPayload) -> Result<Customer, ClientError> {
        self.send(Method::POST, "customers", payload).await
    }

    async fn delete_customer(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("customers/{id}")).await
    }

    async fn list_staff(&self, business: Uuid) -> Result<Vec<Staff>, ClientError> {
        self.list("staff", business).await
    }

    async fn create_staff(&self, payload: &StaffPayload) -> Result<Staff, ClientError> {
        self.send(Method::POST, "staff", payload).await
    }

    async fn delete_staff(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("staff/{id}")).await
    }

    async fn list_services(&self, business: Uuid) -> Result<Vec<Service>, ClientError> {
        self.list("services", business).await
    }

    async fn create_service(&self, payload: &ServicePayload) -> Result<Service, ClientError> {
        self.send(Method::POST, "services", payload).await
    }

    async fn delete_service(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("services/{id}")).await
    }

    async fn list_appointments(&self, business: Uuid) -> Result<Vec<Appointment>, ClientError> {
        self.list("appointments", business).await
    }

    async fn create_appointment(
        &self,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ClientError> {
        self.send(Method::POST, "appointments", payload).await
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("appointments/{id}")).await
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        self.send(
            Method::PATCH,
            &format!("appointments/{id}"),
            &AppointmentChanges::status(status),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_body_accepts_bare_arrays_and_envelopes() {
        let bare: ListBody<u32> = serde_json::from_str("[1, 2]").unwrap();
        let page: ListBody<u32> = serde_json::from_str(
            r#"{"count": 3, "next": null, "previous": null, "results": [1, 2, 3]}"#,
        )
        .unwrap();
        assert_eq!(bare.into_items(), vec![1, 2]);
        assert_eq!(page.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn bad_request_keeps_field_details() {
        let body = br#"{"error": "One or more fields are invalid.", "details": {"phone": ["This value is already in use."]}}"#;
        let ClientError::Validation { message, fields } =
            map_status_error(StatusCode::BAD_REQUEST, body)
        else {
            panic!("expected a validation error");
        };
        assert_eq!(message, "One or more fields are invalid.");
        assert_eq!(fields["phone"], vec!["This value is already in use.".to_string()]);
    }

    #[test]
    fn other_statuses_map_to_their_variants() {
        assert_eq!(map_status_error(StatusCode::NOT_FOUND, b""), ClientError::NotFound);
        assert!(matches!(
            map_status_error(StatusCode::UNAUTHORIZED, br#"{"error": "nope"}"#),
            ClientError::Unauthorized(message) if message == "nope"
        ));
        assert!(matches!(
            map_status_error(StatusCode::BAD_GATEWAY, b"<html>"),
            ClientError::Server { status: 502, .. }
        ));
    }
}
