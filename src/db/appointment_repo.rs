// src/db/appointment_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::pg_store::{PgStore, scope_params};
use crate::{
    common::error::AppError,
    db::store::{EntityStore, ListFilter},
    models::appointment::Appointment,
    services::scope::Scope,
};

const SELECT_APPOINTMENT: &str = r#"
    SELECT
        a.id, a.business_id AS business,
        a.staff_id AS staff, a.customer_id AS customer, a.service_id AS service,
        st.name AS staff_name,
        c.name AS customer_name,
        sv.name AS service_name,
        a.scheduled_at, a.status, a.price, a.notes,
        a.created_at, a.updated_at, a.completed_at
    FROM appointments a
    JOIN businesses b ON b.id = a.business_id
    JOIN staff st ON st.id = a.staff_id
    JOIN customers c ON c.id = a.customer_id
    LEFT JOIN services sv ON sv.id = a.service_id
"#;

#[async_trait]
impl EntityStore<Appointment> for PgStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Appointment>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{SELECT_APPOINTMENT}
             WHERE ($1 OR b.owner_id = $2)
               AND ($3::uuid IS NULL OR a.business_id = $3)
               AND ($4::appointment_status IS NULL OR a.status = $4)
             ORDER BY a.scheduled_at DESC"
        );
        let appointments = sqlx::query_as::<_, Appointment>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(filter.business)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        Ok(appointments)
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        let sql = format!("{SELECT_APPOINTMENT} WHERE a.id = $3 AND ($1 OR b.owner_id = $2)");
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(all)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(appointment)
    }

    async fn insert(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, business_id, staff_id, customer_id, service_id,
                scheduled_at, status, price, notes, completed_at,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.business)
        .bind(appointment.staff)
        .bind(appointment.customer)
        .bind(appointment.service)
        .bind(appointment.scheduled_at)
        .bind(appointment.status)
        .bind(appointment.price)
        .bind(&appointment.notes)
        .bind(appointment.completed_at)
        .bind(appointment.created_at)
        .execute(&self.pool)
        .await?;

        EntityStore::<Appointment>::find(self, &Scope::All, appointment.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update(
        &self,
        scope: &Scope,
        appointment: &Appointment,
    ) -> Result<Option<Appointment>, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(None);
        };

        let result = sqlx::query(
            r#"
            UPDATE appointments a
            SET business_id = $4, staff_id = $5, customer_id = $6, service_id = $7,
                scheduled_at = $8, status = $9, price = $10, notes = $11,
                completed_at = $12, updated_at = NOW()
            FROM businesses b
            WHERE a.id = $3 AND b.id = a.business_id AND ($1 OR b.owner_id = $2)
            "#,
        )
        .bind(all)
        .bind(owner_id)
        .bind(appointment.id)
        .bind(appointment.business)
        .bind(appointment.staff)
        .bind(appointment.customer)
        .bind(appointment.service)
        .bind(appointment.scheduled_at)
        .bind(appointment.status)
        .bind(appointment.price)
        .bind(&appointment.notes)
        .bind(appointment.completed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        EntityStore::<Appointment>::find(self, scope, appointment.id).await
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let Some((all, owner_id)) = scope_params(scope) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            DELETE FROM appointments a
            USING businesses b
            WHERE a.id = $3 AND b.id = a.business_id AND ($1 OR b.owner_id = $2)
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
