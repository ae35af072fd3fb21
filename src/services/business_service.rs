// src/services/business_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{collect, finish, required},
    },
    db::{EntityStore, ListFilter},
    models::business::{Business, BusinessChanges, BusinessPayload},
    services::scope::{Principal, resolve_scope},
};

#[derive(Clone)]
pub struct BusinessService {
    store: Arc<dyn EntityStore<Business>>,
}

impl BusinessService {
    pub fn new(store: Arc<dyn EntityStore<Business>>) -> Self {
        Self { store }
    }

    pub async fn list(&self, principal: &Principal) -> Result<Vec<Business>, AppError> {
        let scope = resolve_scope(principal);
        self.store.list(&scope, &ListFilter::default()).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Business, AppError> {
        let scope = resolve_scope(principal);
        self.store.find(&scope, id).await?.ok_or(AppError::NotFound)
    }

    /// O dono é sempre quem cria; `owner` no payload é descartado.
    pub async fn create(
        &self,
        principal: &Principal,
        payload: BusinessPayload,
    ) -> Result<Business, AppError> {
        let user = principal.require_user()?;
        finish(collect(&payload))?;

        if payload.owner.is_some_and(|owner| owner != user.id) {
            tracing::warn!(
                "Campo owner ignorado na criação de barbearia por {}",
                user.username
            );
        }

        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4(),
            name: required(payload.name, "name")?,
            owner: user.id,
            owner_username: user.username.clone(),
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            logo_url: payload.logo_url,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(&business).await?;
        tracing::info!("💈 Barbearia {} criada por {}", created.id, user.username);
        Ok(created)
    }

    /// PUT: todos os campos são reescritos (opcionais ausentes viram null).
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: BusinessPayload,
    ) -> Result<Business, AppError> {
        principal.require_user()?;
        finish(collect(&payload))?;
        self.apply(principal, id, payload.into()).await
    }

    /// PATCH: só os campos enviados.
    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: BusinessChanges,
    ) -> Result<Business, AppError> {
        principal.require_user()?;
        finish(collect(&changes))?;
        self.apply(principal, id, changes).await
    }

    async fn apply(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: BusinessChanges,
    ) -> Result<Business, AppError> {
        let scope = resolve_scope(principal);
        let mut business = self.store.find(&scope, id).await?.ok_or(AppError::NotFound)?;

        business.apply_changes(changes);

        self.store
            .update(&scope, &business)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Apaga a barbearia e, em cascata, tudo que pende dela.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        let user = principal.require_user()?;
        let scope = resolve_scope(principal);

        if !self.store.delete(&scope, id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!("🗑️ Barbearia {} apagada por {}", id, user.username);
        Ok(())
    }
}
