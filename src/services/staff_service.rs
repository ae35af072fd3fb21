// src/services/staff_service.rs

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    common::{
        error::AppError,
        validation::{choice, collect, finish, json_object, reference, required},
    },
    db::{EntityStore, ListFilter},
    models::{
        business::Business,
        staff::{Staff, StaffChanges, StaffPayload, StaffRole, StaffUpdate},
    },
    services::{
        business_in_scope,
        scope::{Principal, Scope, resolve_scope},
    },
};

#[derive(Clone)]
pub struct StaffService {
    store: Arc<dyn EntityStore<Staff>>,
    businesses: Arc<dyn EntityStore<Business>>,
}

impl StaffService {
    pub fn new(store: Arc<dyn EntityStore<Staff>>, businesses: Arc<dyn EntityStore<Business>>) -> Self {
        Self { store, businesses }
    }

    pub async fn list(&self, principal: &Principal, filter: &ListFilter) -> Result<Vec<Staff>, AppError> {
        let scope = resolve_scope(principal);
        self.store.list(&scope, filter).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Staff, AppError> {
        let scope = resolve_scope(principal);
        self.store.find(&scope, id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, principal: &Principal, payload: StaffPayload) -> Result<Staff, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        let errors = collect(&payload);
        let changes = StaffChanges::from(payload);
        let role = self.validate(&scope, &changes, errors).await?;

        let now = Utc::now();
        let staff = Staff {
            id: Uuid::new_v4(),
            business: required(changes.business, "business")?,
            name: required(changes.name, "name")?,
            phone: required(changes.phone, "phone")?,
            email: changes.email.flatten(),
            role: role.unwrap_or_default(),
            schedule: changes.schedule.unwrap_or_else(|| json!({})),
            photo_url: changes.photo_url.flatten(),
            is_active: changes.is_active.unwrap_or(true),
            hire_date: changes.hire_date.flatten(),
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(&staff).await?;
        tracing::info!("✂️ Profissional {} cadastrado na barbearia {}", created.id, created.business);
        Ok(created)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: StaffPayload,
    ) -> Result<Staff, AppError> {
        let errors = collect(&payload);
        self.apply(principal, id, payload.into(), errors).await
    }

    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: StaffChanges,
    ) -> Result<Staff, AppError> {
        let errors = collect(&changes);
        self.apply(principal, id, changes, errors).await
    }

    async fn apply(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: StaffChanges,
        errors: ValidationErrors,
    ) -> Result<Staff, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        let mut staff = self.store.find(&scope, id).await?.ok_or(AppError::NotFound)?;

        let role = self.validate(&scope, &changes, errors).await?;
        staff.apply_changes(StaffUpdate { changes, role });

        self.store.update(&scope, &staff).await?.ok_or(AppError::NotFound)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        if !self.store.delete(&scope, id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!("🗑️ Profissional {} removido", id);
        Ok(())
    }

    // Cargo + agenda + barbearia no escopo, somados aos erros do derive
    async fn validate(
        &self,
        scope: &Scope,
        changes: &StaffChanges,
        mut errors: ValidationErrors,
    ) -> Result<Option<StaffRole>, AppError> {
        let role = choice::<StaffRole>(&mut errors, "role", changes.role.as_deref());
        json_object(&mut errors, "schedule", changes.schedule.as_ref());
        if let Some(business_id) = changes.business {
            let found = business_in_scope(self.businesses.as_ref(), scope, business_id).await?;
            reference(&mut errors, "business", found);
        }
        finish(errors)?;
        Ok(role)
    }
}
