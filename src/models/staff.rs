// src/models/staff.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::apply;

// Mapeia o CREATE TYPE staff_role do banco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "staff_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    #[default]
    Barber,
    Stylist,
    Manager,
    Receptionist,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Barber => "barber",
            StaffRole::Stylist => "stylist",
            StaffRole::Manager => "manager",
            StaffRole::Receptionist => "receptionist",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "barber" => Ok(StaffRole::Barber),
            "stylist" => Ok(StaffRole::Stylist),
            "manager" => Ok(StaffRole::Manager),
            "receptionist" => Ok(StaffRole::Receptionist),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Staff {
    pub id: Uuid,
    pub business: Uuid,

    #[schema(example = "John Smith")]
    pub name: String,
    #[schema(example = "555-1001")]
    pub phone: String,
    pub email: Option<String>,
    pub role: StaffRole,

    // Agenda livre, guardada como JSONB
    #[schema(value_type = Object)]
    pub schedule: Value,

    pub photo_url: Option<String>,
    pub is_active: bool,
    pub hire_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campos já interpretados de um PATCH/PUT (o cargo chega como texto).
#[derive(Debug, Clone, Default)]
pub struct StaffUpdate {
    pub changes: StaffChanges,
    pub role: Option<StaffRole>,
}

impl Staff {
    pub fn apply_changes(&mut self, update: StaffUpdate) {
        let StaffUpdate { changes, role } = update;
        apply(&mut self.business, changes.business);
        apply(&mut self.name, changes.name);
        apply(&mut self.phone, changes.phone);
        apply(&mut self.email, changes.email);
        apply(&mut self.role, role);
        apply(&mut self.schedule, changes.schedule);
        apply(&mut self.photo_url, changes.photo_url);
        apply(&mut self.is_active, changes.is_active);
        apply(&mut self.hire_date, changes.hire_date);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct StaffPayload {
    #[validate(required(message = "required"))]
    pub business: Option<Uuid>,

    #[validate(required(message = "required"), length(min = 1, max = 255, message = "invalid_length"))]
    #[schema(example = "Mike Johnson")]
    pub name: Option<String>,

    #[validate(required(message = "required"), length(min = 1, max = 20, message = "invalid_length"))]
    #[schema(example = "555-1002")]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    // Texto livre aqui: valores fora do enum viram erro de campo, não 422
    #[schema(example = "barber")]
    pub role: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub schedule: Option<Value>,

    #[validate(url(message = "invalid_url"))]
    pub photo_url: Option<String>,

    pub is_active: Option<bool>,

    #[schema(value_type = Option<String>, format = Date, example = "2024-03-01")]
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct StaffChanges {
    pub business: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "invalid_length"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 20, message = "invalid_length"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(email(message = "invalid_email"))]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,

    pub role: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub schedule: Option<Value>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(url(message = "invalid_url"))]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,

    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>, format = Date)]
    pub hire_date: Option<Option<NaiveDate>>,
}

impl From<StaffPayload> for StaffChanges {
    fn from(payload: StaffPayload) -> Self {
        Self {
            business: payload.business,
            name: payload.name,
            phone: payload.phone,
            email: payload.email.map(Some),
            role: payload.role,
            schedule: payload.schedule,
            photo_url: payload.photo_url.map(Some),
            is_active: payload.is_active,
            hire_date: payload.hire_date.map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_only_known_values() {
        assert_eq!("stylist".parse::<StaffRole>(), Ok(StaffRole::Stylist));
        assert!("janitor".parse::<StaffRole>().is_err());
        assert!("Barber".parse::<StaffRole>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&StaffRole::Receptionist).unwrap();
        assert_eq!(json, "\"receptionist\"");
    }
}
