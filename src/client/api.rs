// src/client/api.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    client::error::ClientError,
    models::{
        appointment::{Appointment, AppointmentPayload, AppointmentStatus},
        auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, UserSummary},
        business::Business,
        customer::{Customer, CustomerPayload},
        service::{Service, ServicePayload},
        staff::{Staff, StaffPayload},
    },
};

/// O que o painel consome da API REST.
///
/// Listagens de entidades filhas vêm sempre recortadas por barbearia. O token
/// de acesso é guardado pela implementação após `set_token`.
#[async_trait]
pub trait BarberApi: Send + Sync + 'static {
    fn set_token(&self, token: Option<String>);

    async fn login(&self, payload: &LoginUserPayload) -> Result<AuthResponse, ClientError>;
    async fn register(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, ClientError>;
    async fn me(&self) -> Result<UserSummary, ClientError>;

    async fn list_businesses(&self) -> Result<Vec<Business>, ClientError>;

    async fn list_customers(&self, business: Uuid) -> Result<Vec<Customer>, ClientError>;
    async fn create_customer(&self, payload: &CustomerPayload) -> Result<Customer, ClientError>;
    async fn delete_customer(&self, id: Uuid) -> Result<(), ClientError>;

    async fn list_staff(&self, business: Uuid) -> Result<Vec<Staff>, ClientError>;
    async fn create_staff(&self, payload: &StaffPayload) -> Result<Staff, ClientError>;
    async fn delete_staff(&self, id: Uuid) -> Result<(), ClientError>;

    async fn list_services(&self, business: Uuid) -> Result<Vec<Service>, ClientError>;
    async fn create_service(&self, payload: &ServicePayload) -> Result<Service, ClientError>;
    async fn delete_service(&self, id: Uuid) -> Result<(), ClientError>;

    async fn list_appointments(&self, business: Uuid) -> Result<Vec<Appointment>, ClientError>;
    async fn create_appointment(
        &self,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ClientError>;
    async fn delete_appointment(&self, id: Uuid) -> Result<(), ClientError>;
    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError>;
}
