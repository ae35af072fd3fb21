// src/db/business_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::pg_store::{PgStore, scope_params};
use crate::{
    common::error::AppError,
    db::store::{EntityStore, ListFilter},
    models::business::Business,
    services::scope::Scope,
};

const SELECT_BUSINESS: &str = r#"
    SELECT
        b.id, b.name,
        b.owner_id AS owner,
        u.username AS owner_username,
        b.address, b.phone, b.email, b.logo_url,
        b.created_at, b.updated_at
    FROM businesses b
    JOIN users u ON u.id = b.owner_id
"#;

#[async_trait]
impl EntityStore<Business> for PgStore {
    async fn list(&self, scope: &Scope, _filter: &ListFilter) -> Result<Vec<Business>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{SELECT_BUSINESS} WHERE ($1 OR b.owner_id = $2) ORDER BY b.created_at DESC"
        );
        let businesses = sqlx::query_as::<_, Business>(&sql)
            .bind(all)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(businesses)
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Business>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        let sql = format!("{SELECT_BUSINESS} WHERE b.id = $3 AND ($1 OR b.owner_id = $2)");
        let business = sqlx::query_as::<_, Business>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(business)
    }

    async fn insert(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query(
            r#"
            INSERT INTO businesses (id, name, owner_id, address, phone, email, logo_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(business.id)
        .bind(&business.name)
        .bind(business.owner)
        .bind(&business.address)
        .bind(&business.phone)
        .bind(&business.email)
        .bind(&business.logo_url)
        .bind(business.created_at)
        .execute(&self.pool)
        .await?;

        // Relê com o JOIN para trazer o owner_username
        EntityStore::<Business>::find(self, &Scope::All, business.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, scope: &Scope, business: &Business) -> Result<Option<Business>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        // O dono nunca é regravado aqui
        let result = sqlx::query(
            r#"
            UPDATE businesses
            SET name = $4, address = $5, phone = $6, email = $7, logo_url = $8, updated_at = NOW()
            WHERE id = $3 AND ($1 OR owner_id = $2)
            "#,
        )
        .bind(all)
        .bind(owner_id)
        .bind(business.id)
        .bind(&business.name)
        .bind(&business.address)
        .bind(&business.phone)
        .bind(&business.email)
        .bind(&business.logo_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        EntityStore::<Business>::find(self, scope, business.id).await
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(false);
        };

        // Filhos caem em cascata pelas FKs
        let result = sqlx::query("DELETE FROM businesses WHERE id = $3 AND ($1 OR owner_id = $2)")
            .bind(all)
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
