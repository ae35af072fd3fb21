// src/services/appointment_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    common::{
        error::AppError,
        validation::{choice, collect, finish, price, reference, required, round_price},
    },
    db::{EntityStore, ListFilter},
    models::{
        appointment::{
            Appointment, AppointmentChanges, AppointmentPayload, AppointmentStatus,
            AppointmentUpdate,
        },
        business::Business,
        customer::Customer,
        service::Service,
        staff::Staff,
    },
    services::{
        business_in_scope,
        scope::{Principal, Scope, resolve_scope},
    },
};

#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn EntityStore<Appointment>>,
    businesses: Arc<dyn EntityStore<Business>>,
    staff: Arc<dyn EntityStore<Staff>>,
    customers: Arc<dyn EntityStore<Customer>>,
    services: Arc<dyn EntityStore<Service>>,
}

// Referências já resolvidas contra a barbearia final do agendamento
struct Target {
    business: Uuid,
    staff: Uuid,
    customer: Uuid,
    service: Option<Uuid>,
}

impl AppointmentService {
    pub fn new(
        store: Arc<dyn EntityStore<Appointment>>,
        businesses: Arc<dyn EntityStore<Business>>,
        staff: Arc<dyn EntityStore<Staff>>,
        customers: Arc<dyn EntityStore<Customer>>,
        services: Arc<dyn EntityStore<Service>>,
    ) -> Self {
        Self {
            store,
            businesses,
            staff,
            customers,
            services,
        }
    }

    pub async fn list(
        &self,
        principal: &Principal,
        filter: &ListFilter,
    ) -> Result<Vec<Appointment>, AppError> {
        let scope = resolve_scope(principal);
        self.store.list(&scope, filter).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Appointment, AppError> {
        let scope = resolve_scope(principal);
        self.store.find(&scope, id).await?.ok_or(AppError::NotFound)
    }

    /// Sem `price`, o agendamento herda o preço atual do serviço (ou zero sem
    /// serviço). O valor fica gravado e nunca é recalculado.
    pub async fn create(
        &self,
        principal: &Principal,
        payload: AppointmentPayload,
    ) -> Result<Appointment, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);

        let mut errors = collect(&payload);
        let changes = AppointmentChanges::from(payload);
        let status = choice::<AppointmentStatus>(&mut errors, "status", changes.status.as_deref());
        price(&mut errors, "price", changes.price.as_ref());
        finish(errors)?;

        let target = Target {
            business: required(changes.business, "business")?,
            staff: required(changes.staff, "staff")?,
            customer: required(changes.customer, "customer")?,
            service: changes.service.flatten(),
        };
        let service = self.check_references(&scope, &target).await?;

        let price = match changes.price {
            Some(price) => round_price(price),
            None => service.map(|s| s.price).unwrap_or(Decimal::ZERO),
        };

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            business: target.business,
            staff: target.staff,
            customer: target.customer,
            service: target.service,
            staff_name: String::new(),
            customer_name: String::new(),
            service_name: None,
            scheduled_at: required(changes.scheduled_at, "scheduled_at")?,
            status: status.unwrap_or_default(),
            price,
            notes: changes.notes.flatten(),
            created_at: now,
            updated_at: now,
            completed_at: changes.completed_at.flatten(),
        };

        let created = self.store.insert(&appointment).await?;
        tracing::info!(
            "📅 Agendamento {} criado para {} em {}",
            created.id,
            created.customer_name,
            created.scheduled_at
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        payload: AppointmentPayload,
    ) -> Result<Appointment, AppError> {
        let errors = collect(&payload);
        self.apply(principal, id, payload.into(), errors).await
    }

    /// PATCH. O caso mais comum é só `{"status": ...}`; qualquer transição vale.
    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, AppError> {
        let errors = collect(&changes);
        self.apply(principal, id, changes, errors).await
    }

    async fn apply(
        &self,
        principal: &Principal,
        id: Uuid,
        mut changes: AppointmentChanges,
        mut errors: ValidationErrors,
    ) -> Result<Appointment, AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        let mut appointment = self.store.find(&scope, id).await?.ok_or(AppError::NotFound)?;

        let status = choice::<AppointmentStatus>(&mut errors, "status", changes.status.as_deref());
        price(&mut errors, "price", changes.price.as_ref());
        finish(errors)?;

        let touches_references = changes.business.is_some()
            || changes.staff.is_some()
            || changes.customer.is_some()
            || changes.service.is_some();

        changes.price = changes.price.map(round_price);
        appointment.apply_changes(AppointmentUpdate { changes, status });

        // Referências conferidas contra o estado final
        if touches_references {
            let target = Target {
                business: appointment.business,
                staff: appointment.staff,
                customer: appointment.customer,
                service: appointment.service,
            };
            self.check_references(&scope, &target).await?;
        }

        self.store
            .update(&scope, &appointment)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        principal.require_user()?;
        let scope = resolve_scope(principal);
        if !self.store.delete(&scope, id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!("🗑️ Agendamento {} removido", id);
        Ok(())
    }

    /// Barbearia no escopo; profissional, cliente e serviço da mesma barbearia.
    /// Devolve o serviço (quando houver) para o cálculo do preço.
    async fn check_references(
        &self,
        scope: &Scope,
        target: &Target,
    ) -> Result<Option<Service>, AppError> {
        let mut errors = ValidationErrors::new();

        let business_found =
            business_in_scope(self.businesses.as_ref(), scope, target.business).await?;
        reference(&mut errors, "business", business_found);

        let staff = self.staff.find(scope, target.staff).await?;
        reference(
            &mut errors,
            "staff",
            staff.is_some_and(|s| s.business == target.business),
        );

        let customer = self.customers.find(scope, target.customer).await?;
        reference(
            &mut errors,
            "customer",
            customer.is_some_and(|c| c.business == target.business),
        );

        let service = match target.service {
            Some(service_id) => {
                let service = self
                    .services
                    .find(scope, service_id)
                    .await?
                    .filter(|s| s.business == target.business);
                reference(&mut errors, "service", service.is_some());
                service
            }
            None => None,
        };

        finish(errors)?;
        Ok(service)
    }
}
