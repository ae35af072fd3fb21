// src/db/customer_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::pg_store::{PgStore, scope_params};
use crate::{
    common::error::AppError,
    db::store::{EntityStore, ListFilter},
    models::customer::Customer,
    services::scope::Scope,
};

const SELECT_CUSTOMER: &str = r#"
    SELECT
        c.id, c.business_id AS business,
        c.name, c.phone, c.email, c.notes, c.preferences,
        c.total_visits, c.total_spent, c.last_visit,
        c.created_at, c.updated_at
    FROM customers c
    JOIN businesses b ON b.id = c.business_id
"#;

#[async_trait]
impl EntityStore<Customer> for PgStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Customer>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{SELECT_CUSTOMER}
             WHERE ($1 OR b.owner_id = $2)
               AND ($3::uuid IS NULL OR c.business_id = $3)
             ORDER BY c.created_at DESC"
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(filter.business)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Customer>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        let sql = format!("{SELECT_CUSTOMER} WHERE c.id = $3 AND ($1 OR b.owner_id = $2)");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn insert(&self, customer: &Customer) -> Result<Customer, AppError> {
        // customers_phone_key vira erro no campo `phone` (ver common::error)
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, business_id, name, phone, email, notes, preferences,
                total_visits, total_spent, last_visit, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            "#,
        )
        .bind(customer.id)
        .bind(customer.business)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.notes)
        .bind(&customer.preferences)
        .bind(customer.total_visits)
        .bind(customer.total_spent)
        .bind(customer.last_visit)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        EntityStore::<Customer>::find(self, &Scope::All, customer.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, scope: &Scope, customer: &Customer) -> Result<Option<Customer>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        // Contadores (visitas, gasto) não são regravados pela API
        let result = sqlx::query(
            r#"
            UPDATE customers c
            SET business_id = $4, name = $5, phone = $6, email = $7,
                notes = $8, preferences = $9, updated_at = NOW()
            FROM businesses b
            WHERE c.id = $3 AND b.id = c.business_id AND ($1 OR b.owner_id = $2)
            "#,
        )
        .bind(all)
        .bind(owner_id)
        .bind(customer.id)
        .bind(customer.business)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.notes)
        .bind(&customer.preferences)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        EntityStore::<Customer>::find(self, scope, customer.id).await
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            DELETE FROM customers c
            USING businesses b
            WHERE c.id = $3 AND b.id = c.business_id AND ($1 OR b.owner_id = $2)
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
