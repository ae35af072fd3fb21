// src/db/staff_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::pg_store::{PgStore, scope_params};
use crate::{
    common::error::AppError,
    db::store::{EntityStore, ListFilter},
    models::staff::Staff,
    services::scope::Scope,
};

const SELECT_STAFF: &str = r#"
    SELECT
        s.id, s.business_id AS business,
        s.name, s.phone, s.email, s.role, s.schedule,
        s.photo_url, s.is_active, s.hire_date,
        s.created_at, s.updated_at
    FROM staff s
    JOIN businesses b ON b.id = s.business_id
"#;

#[async_trait]
impl EntityStore<Staff> for PgStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Staff>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{SELECT_STAFF}
             WHERE ($1 OR b.owner_id = $2)
               AND ($3::uuid IS NULL OR s.business_id = $3)
             ORDER BY s.name ASC"
        );
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(filter.business)
            .fetch_all(&self.pool)
            .await?;

        Ok(staff)
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Staff>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        let sql = format!("{SELECT_STAFF} WHERE s.id = $3 AND ($1 OR b.owner_id = $2)");
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(staff)
    }

    async fn insert(&self, staff: &Staff) -> Result<Staff, AppError> {
        sqlx::query(
            r#"
            INSERT INTO staff (
                id, business_id, name, phone, email, role, schedule,
                photo_url, is_active, hire_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            "#,
        )
        .bind(staff.id)
        .bind(staff.business)
        .bind(&staff.name)
        .bind(&staff.phone)
        .bind(&staff.email)
        .bind(staff.role)
        .bind(&staff.schedule)
        .bind(&staff.photo_url)
        .bind(staff.is_active)
        .bind(staff.hire_date)
        .bind(staff.created_at)
        .execute(&self.pool)
        .await?;

        EntityStore::<Staff>::find(self, &Scope::All, staff.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, scope: &Scope, staff: &Staff) -> Result<Option<Staff>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        let result = sqlx::query(
            r#"
            UPDATE staff s
            SET business_id = $4, name = $5, phone = $6, email = $7, role = $8,
                schedule = $9, photo_url = $10, is_active = $11, hire_date = $12,
                updated_at = NOW()
            FROM businesses b
            WHERE s.id = $3 AND b.id = s.business_id AND ($1 OR b.owner_id = $2)
            "#,
        )
        .bind(all)
        .bind(owner_id)
        .bind(staff.id)
        .bind(staff.business)
        .bind(&staff.name)
        .bind(&staff.phone)
        .bind(&staff.email)
        .bind(staff.role)
        .bind(&staff.schedule)
        .bind(&staff.photo_url)
        .bind(staff.is_active)
        .bind(staff.hire_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        EntityStore::<Staff>::find(self, scope, staff.id).await
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            DELETE FROM staff s
            USING businesses b
            WHERE s.id = $3 AND b.id = s.business_id AND ($1 OR b.owner_id = $2)
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
