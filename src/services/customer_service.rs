// src/services/customer_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    common::{
        error::AppError,
        validation::{collect, finish, json_object, reference, required},
    },
    db::{EntityStore, ListFilter},
    models::{
        business::Business,
        customer::{Customer, CustomerChanges, CustomerPayload},
    },
    services::{
        business_in_scope,
        scope::{Principal, Scope, resolve_scope},
    },
};

// O telefone do cliente é único no sistema todo. Um mesmo número já
// cadastrado em outra barbearia bloqueia o cadastro (erro no campo `phone`).
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn EntityStore<Customer>>,
    businesses: Arc<dyn EntityStore<Business>>,
}

impl CustomerService {
    pub fn new(
        store: Arc<dyn EntityStore<Customer>>,
        businesses: Arc<dyn EntityStore<Business>>,
    ) -> Self {
        Self { store, businesses }
    }

    pub async fn list(
        &self,
        principal: &Principal,
        filter: &ListFilter,
    ) -> Result<Vec<Customer>, AppError> {
        let scope = resolve_scope(principal);
        self.store.list(&scope, filter).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Customer, AppError> {
        let scope = resolve_scope(principal);
        self.store.find(&scope, id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        payload: CustomerPayload,
    ) -> Result<Customer, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        let errors = collect(&payload);
        let changes = CustomerChanges::from(payload);
        self.validate(&scope, &changes, errors).await?;

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            business: required(changes.business, "business")?,
            name: required(changes.name, "name")?,
            phone: required(changes.phone, "phone")?,
            email: changes.email.flatten(),
            notes: changes.notes.flatten(),
            preferences: changes.preferences.unwrap_or_else(|| json!({})),
            total_visits: 0,
            total_spent: Decimal::ZERO,
            last_visit: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(&customer).await?;
        tracing::info!("👤 Cliente {} cadastrado na barbearia {}", created.id, created.business);
        Ok(created)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: CustomerPayload,
    ) -> Result<Customer, AppError> {
        let errors = collect(&payload);
        self.apply(principal, id, payload.into(), errors).await
    }

    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: CustomerChanges,
    ) -> Result<Customer, AppError> {
        let errors = collect(&changes);
        self.apply(principal, id, changes, errors).await
    }

    async fn apply(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: CustomerChanges,
        errors: ValidationErrors,
    ) -> Result<Customer, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        let mut customer = self.store.find(&scope, id).await?.ok_or(AppError::NotFound)?;

        self.validate(&scope, &changes, errors).await?;
        customer.apply_changes(changes);

        self.store
            .update(&scope, &customer)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        if !self.store.delete(&scope, id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!("🗑️ Cliente {} removido", id);
        Ok(())
    }

    async fn validate(
        &self,
        scope: &Scope,
        changes: &CustomerChanges,
        mut errors: ValidationErrors,
    ) -> Result<(), AppError> {
        json_object(&mut errors, "preferences", changes.preferences.as_ref());
        if let Some(business_id) = changes.business {
            let found = business_in_scope(self.businesses.as_ref(), scope, business_id).await?;
            reference(&mut errors, "business", found);
        }
        finish(errors)
    }
}
