// src/db/memory.rs
//
// Backend em memória com as mesmas regras do schema: telefone/usuário/e-mail
// únicos, FKs conferidas, cascatas e SET NULL. Usado nos testes e quando o
// binário sobe sem DATABASE_URL.

use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::{AppError, field_error},
    db::store::{EntityStore, ListFilter, Store, UserStore},
    models::{
        appointment::Appointment,
        auth::{NewUser, Profile, User, UserAccount},
        business::Business,
        customer::Customer,
        service::Service,
        staff::Staff,
    },
    services::scope::Scope,
};

// `seq` desempata ordenações com a ordem de inserção
#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Tables {
    seq: u64,
    last_user_id: i64,
    users: HashMap<i64, UserAccount>,
    businesses: HashMap<Uuid, Row<Business>>,
    staff: HashMap<Uuid, Row<Staff>>,
    customers: HashMap<Uuid, Row<Customer>>,
    services: HashMap<Uuid, Row<Service>>,
    appointments: HashMap<Uuid, Row<Appointment>>,
}

trait Child {
    fn business(&self) -> Uuid;
}

impl Child for Staff {
    fn business(&self) -> Uuid {
        self.business
    }
}

impl Child for Customer {
    fn business(&self) -> Uuid {
        self.business
    }
}

impl Child for Service {
    fn business(&self) -> Uuid {
        self.business
    }
}

impl Child for Appointment {
    fn business(&self) -> Uuid {
        self.business
    }
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn business_visible(&self, scope: &Scope, business_id: Uuid) -> bool {
        self.businesses
            .get(&business_id)
            .is_some_and(|row| scope.permits(row.value.owner))
    }

    fn child_rows<'a, T: Child>(
        &self,
        rows: &'a HashMap<Uuid, Row<T>>,
        scope: &Scope,
        filter: &ListFilter,
    ) -> Vec<&'a Row<T>> {
        rows.values()
            .filter(|row| self.business_visible(scope, row.value.business()))
            .filter(|row| filter.business.is_none_or(|id| row.value.business() == id))
            .collect()
    }

    fn visible_child<'a, T: Child>(
        &self,
        rows: &'a HashMap<Uuid, Row<T>>,
        scope: &Scope,
        id: Uuid,
    ) -> Option<&'a Row<T>> {
        rows.get(&id)
            .filter(|row| self.business_visible(scope, row.value.business()))
    }

    fn require_business(&self, business_id: Uuid) -> Result<(), AppError> {
        if self.businesses.contains_key(&business_id) {
            Ok(())
        } else {
            Err(field_error("business", "does_not_exist"))
        }
    }

    fn check_phone_free(&self, phone: &str, except: Uuid) -> Result<(), AppError> {
        let taken = self
            .customers
            .values()
            .any(|row| row.value.phone == phone && row.value.id != except);
        if taken {
            Err(field_error("phone", "unique"))
        } else {
            Ok(())
        }
    }

    fn check_service(&self, service: &Service) -> Result<(), AppError> {
        self.require_business(service.business)?;
        if service.price.is_sign_negative() && !service.price.is_zero() {
            return Err(field_error("price", "min_value"));
        }
        if service.duration <= 0 {
            return Err(field_error("duration", "must_be_positive"));
        }
        Ok(())
    }

    fn check_appointment_refs(&self, appointment: &Appointment) -> Result<(), AppError> {
        self.require_business(appointment.business)?;
        if !self.staff.contains_key(&appointment.staff) {
            return Err(field_error("staff", "does_not_exist"));
        }
        if !self.customers.contains_key(&appointment.customer) {
            return Err(field_error("customer", "does_not_exist"));
        }
        if let Some(service_id) = appointment.service {
            if !self.services.contains_key(&service_id) {
                return Err(field_error("service", "does_not_exist"));
            }
        }
        Ok(())
    }

    // Campos derivados, resolvidos na leitura como faria o JOIN
    fn hydrate_business(&self, business: &Business) -> Business {
        let mut business = business.clone();
        business.owner_username = self
            .users
            .get(&business.owner)
            .map(|account| account.user.username.clone())
            .unwrap_or_default();
        business
    }

    fn hydrate_appointment(&self, appointment: &Appointment) -> Appointment {
        let mut appointment = appointment.clone();
        appointment.staff_name = self
            .staff
            .get(&appointment.staff)
            .map(|row| row.value.name.clone())
            .unwrap_or_default();
        appointment.customer_name = self
            .customers
            .get(&appointment.customer)
            .map(|row| row.value.name.clone())
            .unwrap_or_default();
        appointment.service_name = appointment
            .service
            .and_then(|id| self.services.get(&id))
            .map(|row| row.value.name.clone());
        appointment
    }

    fn check_user_unique(&self, username: Option<&str>, email: &str, except: i64) -> Result<(), AppError> {
        for account in self.users.values().filter(|a| a.user.id != except) {
            if username.is_some_and(|name| account.user.username == name) {
                return Err(field_error("username", "unique"));
            }
            if account.user.email == email {
                return Err(field_error("email", "unique"));
            }
        }
        Ok(())
    }

    fn remove_appointments_where(&mut self, predicate: impl Fn(&Appointment) -> bool) {
        self.appointments.retain(|_, row| !predicate(&row.value));
    }
}

/// Ordena pela chave e desempata pela ordem de inserção. `descending`
/// inverte as duas comparações (o mais recente vence o empate).
fn ordered<T: Clone, K: Ord>(rows: Vec<&Row<T>>, key: impl Fn(&T) -> K, descending: bool) -> Vec<T> {
    let mut rows = rows;
    rows.sort_by(|a, b| {
        let ordering: Ordering = key(&a.value)
            .cmp(&key(&b.value))
            .then(a.seq.cmp(&b.seq));
        if descending { ordering.reverse() } else { ordering }
    });
    rows.into_iter().map(|row| row.value.clone()).collect()
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---
// Business
// ---
#[async_trait]
impl EntityStore<Business> for MemoryStore {
    async fn list(&self, scope: &Scope, _filter: &ListFilter) -> Result<Vec<Business>, AppError> {
        let tables = self.tables.read().await;
        let rows = tables
            .businesses
            .values()
            .filter(|row| scope.permits(row.value.owner))
            .collect();
        let businesses = ordered(rows, |b: &Business| b.created_at, true);
        Ok(businesses.iter().map(|b| tables.hydrate_business(b)).collect())
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Business>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .businesses
            .get(&id)
            .filter(|row| scope.permits(row.value.owner))
            .map(|row| tables.hydrate_business(&row.value)))
    }

    async fn insert(&self, business: &Business) -> Result<Business, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&business.owner) {
            return Err(field_error("owner", "does_not_exist"));
        }
        let seq = tables.next_seq();
        let mut stored = business.clone();
        stored.updated_at = stored.created_at;
        tables.businesses.insert(stored.id, Row { seq, value: stored.clone() });
        Ok(tables.hydrate_business(&stored))
    }

    async fn update(&self, scope: &Scope, business: &Business) -> Result<Option<Business>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables
            .businesses
            .get_mut(&business.id)
            .filter(|row| scope.permits(row.value.owner))
        else {
            return Ok(None);
        };

        // O dono nunca é regravado
        let stored = &mut row.value;
        stored.name = business.name.clone();
        stored.address = business.address.clone();
        stored.phone = business.phone.clone();
        stored.email = business.email.clone();
        stored.logo_url = business.logo_url.clone();
        stored.updated_at = Utc::now();

        let stored = stored.clone();
        Ok(Some(tables.hydrate_business(&stored)))
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let visible = tables
            .businesses
            .get(&id)
            .is_some_and(|row| scope.permits(row.value.owner));
        if !visible {
            return Ok(false);
        }

        tables.businesses.remove(&id);
        // ON DELETE CASCADE
        tables.staff.retain(|_, row| row.value.business != id);
        tables.customers.retain(|_, row| row.value.business != id);
        tables.services.retain(|_, row| row.value.business != id);
        tables.remove_appointments_where(|a| a.business == id);
        Ok(true)
    }
}

// ---
// Staff
// ---
#[async_trait]
impl EntityStore<Staff> for MemoryStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Staff>, AppError> {
        let tables = self.tables.read().await;
        let rows = tables.child_rows(&tables.staff, scope, filter);
        Ok(ordered(rows, |s: &Staff| s.name.clone(), false))
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Staff>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .visible_child(&tables.staff, scope, id)
            .map(|row| row.value.clone()))
    }

    async fn insert(&self, staff: &Staff) -> Result<Staff, AppError> {
        let mut tables = self.tables.write().await;
        tables.require_business(staff.business)?;

        let seq = tables.next_seq();
        let mut stored = staff.clone();
        stored.updated_at = stored.created_at;
        tables.staff.insert(stored.id, Row { seq, value: stored.clone() });
        Ok(stored)
    }

    async fn update(&self, scope: &Scope, staff: &Staff) -> Result<Option<Staff>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.visible_child(&tables.staff, scope, staff.id).is_none() {
            return Ok(None);
        }
        tables.require_business(staff.business)?;

        let Some(row) = tables.staff.get_mut(&staff.id) else {
            return Ok(None);
        };
        let created_at = row.value.created_at;
        row.value = Staff {
            created_at,
            updated_at: Utc::now(),
            ..staff.clone()
        };
        Ok(Some(row.value.clone()))
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.visible_child(&tables.staff, scope, id).is_none() {
            return Ok(false);
        }
        tables.staff.remove(&id);
        tables.remove_appointments_where(|a| a.staff == id);
        Ok(true)
    }
}

// ---
// Customer
// ---
#[async_trait]
impl EntityStore<Customer> for MemoryStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Customer>, AppError> {
        let tables = self.tables.read().await;
        let rows = tables.child_rows(&tables.customers, scope, filter);
        Ok(ordered(rows, |c: &Customer| c.created_at, true))
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Customer>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .visible_child(&tables.customers, scope, id)
            .map(|row| row.value.clone()))
    }

    async fn insert(&self, customer: &Customer) -> Result<Customer, AppError> {
        let mut tables = self.tables.write().await;
        tables.require_business(customer.business)?;
        // Único no sistema todo, não por barbearia
        tables.check_phone_free(&customer.phone, customer.id)?;

        let seq = tables.next_seq();
        let mut stored = customer.clone();
        stored.updated_at = stored.created_at;
        tables.customers.insert(stored.id, Row { seq, value: stored.clone() });
        Ok(stored)
    }

    async fn update(&self, scope: &Scope, customer: &Customer) -> Result<Option<Customer>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.visible_child(&tables.customers, scope, customer.id).is_none() {
            return Ok(None);
        }
        tables.require_business(customer.business)?;
        tables.check_phone_free(&customer.phone, customer.id)?;

        let Some(row) = tables.customers.get_mut(&customer.id) else {
            return Ok(None);
        };
        // Contadores continuam os gravados
        let stored = &mut row.value;
        stored.business = customer.business;
        stored.name = customer.name.clone();
        stored.phone = customer.phone.clone();
        stored.email = customer.email.clone();
        stored.notes = customer.notes.clone();
        stored.preferences = customer.preferences.clone();
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.visible_child(&tables.customers, scope, id).is_none() {
            return Ok(false);
        }
        tables.customers.remove(&id);
        tables.remove_appointments_where(|a| a.customer == id);
        Ok(true)
    }
}

// ---
// Service
// ---
#[async_trait]
impl EntityStore<Service> for MemoryStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Service>, AppError> {
        let tables = self.tables.read().await;
        let rows = tables.child_rows(&tables.services, scope, filter);
        Ok(ordered(rows, |s: &Service| s.name.clone(), false))
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Service>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .visible_child(&tables.services, scope, id)
            .map(|row| row.value.clone()))
    }

    async fn insert(&self, service: &Service) -> Result<Service, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_service(service)?;

        let seq = tables.next_seq();
        let mut stored = service.clone();
        stored.updated_at = stored.created_at;
        tables.services.insert(stored.id, Row { seq, value: stored.clone() });
        Ok(stored)
    }

    async fn update(&self, scope: &Scope, service: &Service) -> Result<Option<Service>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.visible_child(&tables.services, scope, service.id).is_none() {
            return Ok(None);
        }
        tables.check_service(service)?;

        let Some(row) = tables.services.get_mut(&service.id) else {
            return Ok(None);
        };
        let created_at = row.value.created_at;
        row.value = Service {
            created_at,
            updated_at: Utc::now(),
            ..service.clone()
        };
        Ok(Some(row.value.clone()))
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.visible_child(&tables.services, scope, id).is_none() {
            return Ok(false);
        }
        tables.services.remove(&id);
        // ON DELETE SET NULL
        for row in tables.appointments.values_mut() {
            if row.value.service == Some(id) {
                row.value.service = None;
            }
        }
        Ok(true)
    }
}

// ---
// Appointment
// ---
#[async_trait]
impl EntityStore<Appointment> for MemoryStore {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<Appointment>, AppError> {
        let tables = self.tables.read().await;
        let rows = tables
            .child_rows(&tables.appointments, scope, filter)
            .into_iter()
            .filter(|row| filter.status.is_none_or(|status| row.value.status == status))
            .collect();
        let appointments = ordered(rows, |a: &Appointment| a.scheduled_at, true);
        Ok(appointments
            .iter()
            .map(|a| tables.hydrate_appointment(a))
            .collect())
    }

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .visible_child(&tables.appointments, scope, id)
            .map(|row| tables.hydrate_appointment(&row.value)))
    }

    async fn insert(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_appointment_refs(appointment)?;

        let seq = tables.next_seq();
        let mut stored = appointment.clone();
        stored.updated_at = stored.created_at;
        tables
            .appointments
            .insert(stored.id, Row { seq, value: stored.clone() });
        Ok(tables.hydrate_appointment(&stored))
    }

    async fn update(
        &self,
        scope: &Scope,
        appointment: &Appointment,
    ) -> Result<Option<Appointment>, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .visible_child(&tables.appointments, scope, appointment.id)
            .is_none()
        {
            return Ok(None);
        }
        tables.check_appointment_refs(appointment)?;

        let Some(row) = tables.appointments.get_mut(&appointment.id) else {
            return Ok(None);
        };
        let created_at = row.value.created_at;
        row.value = Appointment {
            created_at,
            updated_at: Utc::now(),
            ..appointment.clone()
        };
        let stored = row.value.clone();
        Ok(Some(tables.hydrate_appointment(&stored)))
    }

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .visible_child(&tables.appointments, scope, id)
            .is_none()
        {
            return Ok(false);
        }
        tables.appointments.remove(&id);
        Ok(true)
    }
}

// ---
// Usuários
// ---
#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<UserAccount, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(Some(&new_user.username), &new_user.email, 0)?;

        tables.last_user_id += 1;
        let id = tables.last_user_id;
        let now = Utc::now();
        let account = UserAccount {
            user: User {
                id,
                username: new_user.username,
                email: new_user.email,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                password_hash: new_user.password_hash,
                is_staff: false,
                created_at: now,
                updated_at: now,
            },
            profile: Profile {
                user_id: id,
                is_master: false,
                phone: new_user.phone,
                avatar_url: None,
                created_at: now,
                updated_at: now,
            },
        };
        tables.users.insert(id, account.clone());
        Ok(account)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<UserAccount>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|account| account.user.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|account| account.user.email == email)
            .cloned())
    }

    async fn update_user(&self, account: &UserAccount) -> Result<UserAccount, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(None, &account.user.email, account.user.id)?;

        let stored = tables
            .users
            .get_mut(&account.user.id)
            .ok_or(AppError::NotFound)?;
        let now = Utc::now();
        stored.user.first_name = account.user.first_name.clone();
        stored.user.last_name = account.user.last_name.clone();
        stored.user.email = account.user.email.clone();
        stored.user.updated_at = now;
        stored.profile.phone = account.profile.phone.clone();
        stored.profile.avatar_url = account.profile.avatar_url.clone();
        stored.profile.updated_at = now;
        Ok(stored.clone())
    }

    async fn set_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let stored = tables.users.get_mut(&user_id).ok_or(AppError::NotFound)?;
        stored.user.password_hash = password_hash.to_string();
        stored.user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_master(&self, user_id: i64, is_master: bool) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let stored = tables.users.get_mut(&user_id).ok_or(AppError::NotFound)?;
        stored.profile.is_master = is_master;
        stored.profile.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::models::{appointment::AppointmentStatus, staff::StaffRole};

    async fn user(store: &MemoryStore, username: &str) -> i64 {
        store
            .create_user(NewUser {
                username: username.into(),
                email: format!("{username}@example.com"),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: "x".into(),
                phone: String::new(),
            })
            .await
            .unwrap()
            .user
            .id
    }

    fn business(owner: i64, name: &str) -> Business {
        let now = Utc::now();
        Business {
            id: Uuid::new_v4(),
            name: name.into(),
            owner,
            owner_username: String::new(),
            address: None,
            phone: None,
            email: None,
            logo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn customer(business: Uuid, phone: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id: Uuid::new_v4(),
            business,
            name: "Maria".into(),
            phone: phone.into(),
            email: None,
            notes: None,
            preferences: json!({}),
            total_visits: 0,
            total_spent: Decimal::ZERO,
            last_visit: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn staff(business: Uuid, name: &str) -> Staff {
        let now = Utc::now();
        Staff {
            id: Uuid::new_v4(),
            business,
            name: name.into(),
            phone: "555-1001".into(),
            email: None,
            role: StaffRole::Barber,
            schedule: json!({}),
            photo_url: None,
            is_active: true,
            hire_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(business: Uuid) -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::new_v4(),
            business,
            name: "Corte".into(),
            description: None,
            price: Decimal::new(3500, 2),
            duration: 30,
            is_active: true,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn appointment(business: Uuid, staff: Uuid, customer: Uuid, service: Option<Uuid>) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            business,
            staff,
            customer,
            service,
            staff_name: String::new(),
            customer_name: String::new(),
            service_name: None,
            scheduled_at: now + Duration::hours(1),
            status: AppointmentStatus::Scheduled,
            price: Decimal::new(3500, 2),
            notes: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn business_list_is_cut_by_owner_and_carries_owner_username() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        store.insert(&business(alice, "A")).await.unwrap();
        store.insert(&business(bob, "B")).await.unwrap();

        let mine: Vec<Business> = store
            .list(&Scope::OwnedBy(alice), &ListFilter::default())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].owner_username, "alice");

        let all: Vec<Business> = store.list(&Scope::All, &ListFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        // Mais recente primeiro
        assert_eq!(all[0].name, "B");

        let none: Vec<Business> = store.list(&Scope::None, &ListFilter::default()).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn customer_phone_is_unique_across_businesses() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner").await;
        let first = store.insert(&business(owner, "A")).await.unwrap();
        let second = store.insert(&business(owner, "B")).await.unwrap();

        store.insert(&customer(first.id, "555-0101")).await.unwrap();
        let err = store
            .insert(&customer(second.id, "555-0101"))
            .await
            .unwrap_err();

        let AppError::ValidationError(errors) = err else {
            panic!("expected a field error");
        };
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[tokio::test]
    async fn deletes_cascade_and_null_out_services() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner").await;
        let shop = store.insert(&business(owner, "A")).await.unwrap();
        let barber = store.insert(&staff(shop.id, "John")).await.unwrap();
        let client = store.insert(&customer(shop.id, "555-0101")).await.unwrap();
        let cut = store.insert(&service(shop.id)).await.unwrap();
        let booked = store
            .insert(&appointment(shop.id, barber.id, client.id, Some(cut.id)))
            .await
            .unwrap();
        assert_eq!(booked.service_name.as_deref(), Some("Corte"));
        assert_eq!(booked.staff_name, "John");

        assert!(EntityStore::<Service>::delete(&store, &Scope::All, cut.id).await.unwrap());
        let after: Appointment = store.find(&Scope::All, booked.id).await.unwrap().unwrap();
        assert_eq!(after.service, None);
        assert_eq!(after.service_name, None);

        assert!(EntityStore::<Business>::delete(&store, &Scope::All, shop.id).await.unwrap());
        let left: Vec<Appointment> = store.list(&Scope::All, &ListFilter::default()).await.unwrap();
        assert!(left.is_empty());
        let staff_left: Vec<Staff> = store.list(&Scope::All, &ListFilter::default()).await.unwrap();
        assert!(staff_left.is_empty());
    }

    #[tokio::test]
    async fn update_out_of_scope_is_a_miss() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let shop = store.insert(&business(alice, "A")).await.unwrap();

        let mut renamed = shop.clone();
        renamed.name = "Hijacked".into();
        let result: Option<Business> = store.update(&Scope::OwnedBy(bob), &renamed).await.unwrap();
        assert!(result.is_none());

        let unchanged: Business = store.find(&Scope::All, shop.id).await.unwrap().unwrap();
        assert_eq!(unchanged.name, "A");
    }

    #[tokio::test]
    async fn duplicate_username_is_a_field_error() {
        let store = MemoryStore::new();
        user(&store, "alice").await;

        let err = store
            .create_user(NewUser {
                username: "alice".into(),
                email: "other@example.com".into(),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: "x".into(),
                phone: String::new(),
            })
            .await
            .unwrap_err();
        let AppError::ValidationError(errors) = err else {
            panic!("expected a field error");
        };
        assert!(errors.field_errors().contains_key("username"));
    }
}
