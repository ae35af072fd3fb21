// src/models/customer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::apply;

// --- CLIENTE ---
// O telefone é único no sistema todo (não por barbearia).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub business: Uuid,

    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "555-0101")]
    pub phone: String,
    pub email: Option<String>,

    pub notes: Option<String>,
    #[schema(value_type = Object)]
    pub preferences: Value,

    // Contadores: somente leitura pela API
    pub total_visits: i32,
    #[schema(value_type = String, example = "0.00")]
    pub total_spent: Decimal,
    pub last_visit: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn apply_changes(&mut self, changes: CustomerChanges) {
        apply(&mut self.business, changes.business);
        apply(&mut self.name, changes.name);
        apply(&mut self.phone, changes.phone);
        apply(&mut self.email, changes.email);
        apply(&mut self.notes, changes.notes);
        apply(&mut self.preferences, changes.preferences);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerPayload {
    #[validate(required(message = "required"))]
    pub business: Option<Uuid>,

    #[validate(required(message = "required"), length(min = 1, max = 255, message = "invalid_length"))]
    #[schema(example = "Maria da Silva")]
    pub name: Option<String>,

    #[validate(required(message = "required"), length(min = 1, max = 20, message = "invalid_length"))]
    #[schema(example = "555-0101")]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub notes: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub preferences: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CustomerChanges {
    pub business: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "invalid_length"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 20, message = "invalid_length"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(email(message = "invalid_email"))]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,

    #[schema(value_type = Option<Object>)]
    pub preferences: Option<Value>,
}

impl From<CustomerPayload> for CustomerChanges {
    fn from(payload: CustomerPayload) -> Self {
        Self {
            business: payload.business,
            name: payload.name,
            phone: payload.phone,
            email: payload.email.map(Some),
            notes: payload.notes.map(Some),
            preferences: payload.preferences,
        }
    }
}
