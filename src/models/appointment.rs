// src/models/appointment.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::apply;

// Mapeia o CREATE TYPE appointment_status do banco.
// Qualquer transição é permitida, não há máquina de estados.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 6] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub business: Uuid,
    pub staff: Uuid,
    pub customer: Uuid,
    // Vira NULL quando o serviço é apagado
    pub service: Option<Uuid>,

    // Somente leitura, vindos dos JOINs
    pub staff_name: String,
    pub customer_name: String,
    pub service_name: Option<String>,

    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,

    // Gravado na criação. Mudar o preço do serviço depois não altera este valor.
    #[schema(value_type = String, example = "35.00")]
    pub price: Decimal,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Campos já interpretados de um PATCH/PUT (o status chega como texto).
#[derive(Debug, Clone, Default)]
pub struct AppointmentUpdate {
    pub changes: AppointmentChanges,
    pub status: Option<AppointmentStatus>,
}

impl Appointment {
    pub fn apply_changes(&mut self, update: AppointmentUpdate) {
        let AppointmentUpdate { changes, status } = update;
        apply(&mut self.business, changes.business);
        apply(&mut self.staff, changes.staff);
        apply(&mut self.customer, changes.customer);
        apply(&mut self.service, changes.service);
        apply(&mut self.scheduled_at, changes.scheduled_at);
        apply(&mut self.status, status);
        apply(&mut self.price, changes.price);
        apply(&mut self.notes, changes.notes);
        apply(&mut self.completed_at, changes.completed_at);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AppointmentPayload {
    #[validate(required(message = "required"))]
    pub business: Option<Uuid>,

    #[validate(required(message = "required"))]
    pub staff: Option<Uuid>,

    #[validate(required(message = "required"))]
    pub customer: Option<Uuid>,

    pub service: Option<Uuid>,

    #[validate(required(message = "required"))]
    pub scheduled_at: Option<DateTime<Utc>>,

    #[schema(example = "scheduled")]
    pub status: Option<String>,

    // Omitido ou null: copia o preço do serviço (ou zero sem serviço)
    #[schema(value_type = Option<String>, example = "50.00")]
    pub price: Option<Decimal>,

    pub notes: Option<String>,

    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AppointmentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Uuid>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Uuid>)]
    pub service: Option<Option<Uuid>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl AppointmentChanges {
    /// PATCH com apenas o novo status (a mudança mais comum no painel).
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }
}

// PUT: campo omitido fica como está; os padrões só valem na criação
impl From<AppointmentPayload> for AppointmentChanges {
    fn from(payload: AppointmentPayload) -> Self {
        Self {
            business: payload.business,
            staff: payload.staff,
            customer: payload.customer,
            service: payload.service.map(Some),
            scheduled_at: payload.scheduled_at,
            status: payload.status,
            price: payload.price,
            notes: payload.notes.map(Some),
            completed_at: payload.completed_at.map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_round_trips_through_its_wire_name() {
        for status in AppointmentStatus::ALL {
            assert_eq!(status.as_str().parse::<AppointmentStatus>(), Ok(status));
        }
        assert!("done".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn status_patch_only_serializes_the_status() {
        let body = serde_json::to_value(AppointmentChanges::status(AppointmentStatus::NoShow)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "no_show"}));
    }
}
