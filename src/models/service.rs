// src/models/service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::apply;

// Serviço oferecido pela barbearia (corte, barba, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub business: Uuid,

    #[schema(example = "Corte Clássico")]
    pub name: String,
    pub description: Option<String>,

    #[schema(value_type = String, example = "35.00")]
    pub price: Decimal,
    // Em minutos
    #[schema(example = 30)]
    pub duration: i32,

    pub is_active: bool,
    pub category: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn apply_changes(&mut self, changes: ServiceChanges) {
        apply(&mut self.business, changes.business);
        apply(&mut self.name, changes.name);
        apply(&mut self.description, changes.description);
        apply(&mut self.price, changes.price);
        apply(&mut self.duration, changes.duration);
        apply(&mut self.is_active, changes.is_active);
        apply(&mut self.category, changes.category);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ServicePayload {
    #[validate(required(message = "required"))]
    pub business: Option<Uuid>,

    #[validate(required(message = "required"), length(min = 1, max = 255, message = "invalid_length"))]
    #[schema(example = "Barba")]
    pub name: Option<String>,

    pub description: Option<String>,

    // Faixa (>= 0, 2 casas) conferida no serviço; o validator não conhece Decimal
    #[validate(required(message = "required"))]
    #[schema(value_type = Option<String>, example = "25.00")]
    pub price: Option<Decimal>,

    #[validate(required(message = "required"), range(min = 1, message = "must_be_positive"))]
    #[schema(example = 20)]
    pub duration: Option<i32>,

    pub is_active: Option<bool>,

    #[validate(length(max = 100, message = "invalid_length"))]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ServiceChanges {
    pub business: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "invalid_length"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,

    #[validate(range(min = 1, message = "must_be_positive"))]
    pub duration: Option<i32>,

    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(length(max = 100, message = "invalid_length"))]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
}

impl From<ServicePayload> for ServiceChanges {
    fn from(payload: ServicePayload) -> Self {
        Self {
            business: payload.business,
            name: payload.name,
            description: payload.description.map(Some),
            price: payload.price,
            duration: payload.duration,
            is_active: payload.is_active,
            category: payload.category.map(Some),
        }
    }
}
