// src/services/catalog_service.rs
//
// Catálogo de serviços da barbearia (corte, barba, ...).

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    common::{
        error::AppError,
        validation::{collect, finish, price, reference, required, round_price},
    },
    db::{EntityStore, ListFilter},
    models::{
        business::Business,
        service::{Service, ServiceChanges, ServicePayload},
    },
    services::{
        business_in_scope,
        scope::{Principal, Scope, resolve_scope},
    },
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn EntityStore<Service>>,
    businesses: Arc<dyn EntityStore<Business>>,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn EntityStore<Service>>,
        businesses: Arc<dyn EntityStore<Business>>,
    ) -> Self {
        Self { store, businesses }
    }

    pub async fn list(
        &self,
        principal: &Principal,
        filter: &ListFilter,
    ) -> Result<Vec<Service>, AppError> {
        let scope = resolve_scope(principal);
        self.store.list(&scope, filter).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Service, AppError> {
        let scope = resolve_scope(principal);
        self.store.find(&scope, id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        payload: ServicePayload,
    ) -> Result<Service, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        let errors = collect(&payload);
        let changes = ServiceChanges::from(payload);
        self.validate(&scope, &changes, errors).await?;

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            business: required(changes.business, "business")?,
            name: required(changes.name, "name")?,
            description: changes.description.flatten(),
            price: round_price(required(changes.price, "price")?),
            duration: required(changes.duration, "duration")?,
            is_active: changes.is_active.unwrap_or(true),
            category: changes.category.flatten(),
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(&service).await?;
        tracing::info!("📋 Serviço {} ({}) criado na barbearia {}", created.name, created.id, created.business);
        Ok(created)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: ServicePayload,
    ) -> Result<Service, AppError> {
        let errors = collect(&payload);
        self.apply(principal, id, payload.into(), errors).await
    }

    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: ServiceChanges,
    ) -> Result<Service, AppError> {
        let errors = collect(&changes);
        self.apply(principal, id, changes, errors).await
    }

    // Mudar o preço aqui não mexe nos agendamentos já criados
    async fn apply(
        &self,
        principal: &Principal,
        id: Uuid,
        mut changes: ServiceChanges,
        errors: ValidationErrors,
    ) -> Result<Service, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        let mut service = self.store.find(&scope, id).await?.ok_or(AppError::NotFound)?;

        self.validate(&scope, &changes, errors).await?;
        changes.price = changes.price.map(round_price);
        service.apply_changes(changes);

        self.store
            .update(&scope, &service)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Agendamentos que apontavam para o serviço ficam sem serviço.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        if !self.store.delete(&scope, id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!("🗑️ Serviço {} removido", id);
        Ok(())
    }

    async fn validate(
        &self,
        scope: &Scope,
        changes: &ServiceChanges,
        mut errors: ValidationErrors,
    ) -> Result<(), AppError> {
        price(&mut errors, "price", changes.price.as_ref());
        if let Some(business_id) = changes.business {
            let found = business_in_scope(self.businesses.as_ref(), scope, business_id).await?;
            reference(&mut errors, "business", found);
        }
        finish(errors)
    }
}
