// src/db/service_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::pg_store::{PgStore, scope_params};
use crate::{
    common::error::AppError,
    db::store::{EntityStore, ListFilter},
    models::service::Service,
    services::scope::Scope,
};

const SELECT_SERVICE: &str = r#"
    SELECT
        sv.id, sv.business_id AS business,
        sv.name, sv.description, sv.price, sv.duration,
        sv.is_active, sv.category,
        sv.created_at, sv.updated_at
    FROM services sv
    JOIN businesses b ON b.id = sv.business_id
"#;

#[async_trait]
impl EntityStore<Service> for PgStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Service>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{SELECT_SERVICE}
             WHERE ($1 OR b.owner_id = $2)
               AND ($3::uuid IS NULL OR sv.business_id = $3)
             ORDER BY sv.name ASC"
        );
        let services = sqlx::query_as::<_, Service>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(filter.business)
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Service>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        let sql = format!("{SELECT_SERVICE} WHERE sv.id = $3 AND ($1 OR b.owner_id = $2)");
        let service = sqlx::query_as::<_, Service>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    async fn insert(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, business_id, name, description, price, duration,
                is_active, category, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            "#,
        )
        .bind(service.id)
        .bind(service.business)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration)
        .bind(service.is_active)
        .bind(&service.category)
        .bind(service.created_at)
        .execute(&self.pool)
        .await?;

        EntityStore::<Service>::find(self, &Scope::All, service.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, scope: &Scope, service: &Service) -> Result<Option<Service>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        // Agendamentos já criados guardam o preço antigo
        let result = sqlx::query(
            r#"
            UPDATE services sv
            SET business_id = $4, name = $5, description = $6, price = $7,
                duration = $8, is_active = $9, category = $10, updated_at = NOW()
            FROM businesses b
            WHERE sv.id = $3 AND b.id = sv.business_id AND ($1 OR b.owner_id = $2)
            "#,
        )
        .bind(all)
        .bind(owner_id)
        .bind(service.id)
        .bind(service.business)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration)
        .bind(service.is_active)
        .bind(&service.category)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        EntityStore::<Service>::find(self, scope, service.id).await
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(false);
        };

        // appointments.service_id vira NULL (ON DELETE SET NULL)
        let result = sqlx::query(
            r#"
            DELETE FROM services sv
            USING businesses b
            WHERE sv.id = $3 AND b.id = sv.business_id AND ($1 OR b.owner_id = $2)
            "#,
        )
        .bind(all)
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
