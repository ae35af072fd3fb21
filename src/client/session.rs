// src/client/session.rs
//
// Protocolo de mutação otimista. Cada operação:
//   1. trava o estado, aplica a mudança local e solta a trava;
//   2. chama a API (sem trava);
//   3. trava de novo e confirma ou desfaz, sempre pela chave da entrada.
// Várias operações podem estar em voo ao mesmo tempo; cada uma carrega o
// que capturou no passo 1.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    client::{
        api::BarberApi,
        error::ClientError,
        list::{EntityKey, EntityList, Keyed},
        state::{AppointmentForm, ClientState, CustomerForm, ServiceForm, StaffForm},
    },
    models::{
        appointment::{Appointment, AppointmentPayload, AppointmentStatus},
        auth::{AuthResponse, LoginUserPayload, RegisterUserPayload},
        customer::{Customer, CustomerPayload},
        service::{Service, ServicePayload},
        staff::{Staff, StaffPayload, StaffRole},
    },
};

// Liga cada tipo à sua lista e ao seu contador no ClientState
trait Cached: Keyed + Clone + Send + 'static {
    const LABEL: &'static str;

    fn slot(state: &mut ClientState) -> (&mut EntityList<Self>, &mut usize);
}

impl Cached for Customer {
    const LABEL: &'static str = "Customer";

    fn slot(state: &mut ClientState) -> (&mut EntityList<Self>, &mut usize) {
        (&mut state.customers, &mut state.total_customers)
    }
}

impl Cached for Staff {
    const LABEL: &'static str = "Staff member";

    fn slot(state: &mut ClientState) -> (&mut EntityList<Self>, &mut usize) {
        (&mut state.staff, &mut state.total_staff)
    }
}

impl Cached for Service {
    const LABEL: &'static str = "Service";

    fn slot(state: &mut ClientState) -> (&mut EntityList<Self>, &mut usize) {
        (&mut state.services, &mut state.total_services)
    }
}

impl Cached for Appointment {
    const LABEL: &'static str = "Appointment";

    fn slot(state: &mut ClientState) -> (&mut EntityList<Self>, &mut usize) {
        (&mut state.appointments, &mut state.total_appointments)
    }
}

/// Sessão do painel: o estado compartilhado mais a API.
pub struct ClientSession<A: BarberApi> {
    api: Arc<A>,
    state: Arc<Mutex<ClientState>>,
}

impl<A: BarberApi> Clone for ClientSession<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

impl<A: BarberApi> ClientSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(Mutex::new(ClientState::default())),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Cópia do estado atual (para renderizar ou inspecionar).
    pub async fn snapshot(&self) -> ClientState {
        self.state.lock().await.clone()
    }

    /// Edita o estado diretamente (formulários, campos digitados).
    pub async fn update_state<R>(&self, edit: impl FnOnce(&mut ClientState) -> R) -> R {
        let mut state = self.state.lock().await;
        edit(&mut state)
    }

    // ---
    // Autenticação
    // ---

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let payload = LoginUserPayload {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        self.authenticate(self.api.login(&payload)).await
    }

    pub async fn register(&self, payload: RegisterUserPayload) -> Result<(), ClientError> {
        self.authenticate(self.api.register(&payload)).await
    }

    async fn authenticate(
        &self,
        request: impl Future<Output = Result<AuthResponse, ClientError>>,
    ) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.auth_loading = true;
            state.auth_error = None;
        }

        let result = request.await;

        let mut state = self.state.lock().await;
        state.auth_loading = false;
        match result {
            Ok(response) => {
                self.api.set_token(Some(response.access));
                state.is_master = response.user.is_master;
                state.user = Some(response.user);
                state.is_authenticated = true;
                Ok(())
            }
            Err(e) => {
                state.auth_error = Some(e.display_message());
                Err(e)
            }
        }
    }

    /// Descarta o token e todo o estado da sessão.
    pub async fn logout(&self) {
        self.api.set_token(None);
        self.state.lock().await.reset();
    }

    /// Recarrega o perfil do usuário logado.
    pub async fn refresh_user(&self) -> Result<(), ClientError> {
        let result = self.api.me().await;
        let mut state = self.state.lock().await;
        match result {
            Ok(user) => {
                state.is_master = user.is_master;
                state.user = Some(user);
                Ok(())
            }
            Err(e) => {
                let message = format!("Error loading profile: {}", e.display_message());
                self.report(&mut state, &e, message);
                Err(e)
            }
        }
    }

    // Toda falha vira mensagem de erro; um 401 também derruba a sessão
    fn report(&self, state: &mut ClientState, error: &ClientError, message: String) {
        state.fail(message);
        if matches!(error, ClientError::Unauthorized(_)) {
            tracing::warn!("🔒 Sessão expirada, novo login necessário");
            self.api.set_token(None);
            state.expire_session(error.display_message());
        }
    }

    pub async fn clear_messages(&self) {
        self.state.lock().await.clear_messages();
    }

    pub async fn toggle_customer_modal(&self) {
        let mut state = self.state.lock().await;
        state.show_customer_modal = !state.show_customer_modal;
    }

    pub async fn toggle_staff_modal(&self) {
        let mut state = self.state.lock().await;
        state.show_staff_modal = !state.show_staff_modal;
    }

    pub async fn toggle_service_modal(&self) {
        let mut state = self.state.lock().await;
        state.show_service_modal = !state.show_service_modal;
    }

    pub async fn toggle_appointment_modal(&self) {
        let mut state = self.state.lock().await;
        state.show_appointment_modal = !state.show_appointment_modal;
    }

    // ---
    // Carregamento (substitui o cache, nunca mescla)
    // ---

    pub async fn load_businesses(&self) -> Result<(), ClientError> {
        let result = self.api.list_businesses().await;
        let mut state = self.state.lock().await;
        match result {
            Ok(businesses) => {
                state.businesses = businesses;
                Ok(())
            }
            Err(e) => {
                self.report(
                    &mut state,
                    &e,
                    format!("Error loading businesses: {}", e.display_message()),
                );
                Err(e)
            }
        }
    }

    /// Troca a barbearia ativa e recarrega as quatro listas dependentes.
    pub async fn select_business(&self, business: Uuid) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            if state.selected_business != Some(business) {
                state.reset_business_data();
            }
            state.selected_business = Some(business);
            state.is_loading = true;
        }

        let (customers, staff, services, appointments) = tokio::join!(
            self.load_customers(),
            self.load_staff(),
            self.load_services(),
            self.load_appointments(),
        );

        {
            let mut state = self.state.lock().await;
            if state.selected_business == Some(business) {
                state.is_loading = false;
            }
        }

        customers.and(staff).and(services).and(appointments)
    }

    pub async fn load_customers(&self) -> Result<(), ClientError> {
        let Some(business) = self.selected_business().await else {
            return Ok(());
        };
        let result = self.api.list_customers(business).await;
        self.store_list(business, result).await
    }

    pub async fn load_staff(&self) -> Result<(), ClientError> {
        let Some(business) = self.selected_business().await else {
            return Ok(());
        };
        let result = self.api.list_staff(business).await;
        self.store_list(business, result).await
    }

    pub async fn load_services(&self) -> Result<(), ClientError> {
        let Some(business) = self.selected_business().await else {
            return Ok(());
        };
        let result = self.api.list_services(business).await;
        self.store_list(business, result).await
    }

    pub async fn load_appointments(&self) -> Result<(), ClientError> {
        let Some(business) = self.selected_business().await else {
            return Ok(());
        };
        let result = self.api.list_appointments(business).await;
        self.store_list(business, result).await
    }

    async fn selected_business(&self) -> Option<Uuid> {
        self.state.lock().await.selected_business
    }

    async fn store_list<T: Cached>(
        &self,
        business: Uuid,
        result: Result<Vec<T>, ClientError>,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        // Resposta de uma barbearia que já não está ativa
        if state.selected_business != Some(business) {
            return Ok(());
        }
        match result {
            Ok(entities) => {
                let (list, count) = T::slot(&mut *state);
                list.replace_all(entities);
                *count = list.len();
                Ok(())
            }
            Err(e) => {
                let message = format!(
                    "Error loading {}s: {}",
                    T::LABEL.to_lowercase(),
                    e.display_message()
                );
                self.report(&mut state, &e, message);
                Err(e)
            }
        }
    }

    // ---
    // Criação otimista
    // ---

    pub async fn create_customer(&self) -> Result<Customer, ClientError> {
        let (key, payload): (EntityKey, CustomerPayload) = self
            .stage_create(|state, business| {
                let payload = state.customer_form.to_payload(business)?;
                let now = Utc::now();
                let provisional = Customer {
                    id: Uuid::nil(),
                    business,
                    name: payload.name.clone().unwrap_or_default(),
                    phone: payload.phone.clone().unwrap_or_default(),
                    email: payload.email.clone(),
                    notes: None,
                    preferences: json!({}),
                    total_visits: 0,
                    total_spent: Decimal::ZERO,
                    last_visit: None,
                    created_at: now,
                    updated_at: now,
                };
                state.customer_form = CustomerForm::default();
                state.show_customer_modal = false;
                Ok((payload, provisional))
            })
            .await?;

        let result = self.api.create_customer(&payload).await;
        self.commit_create(key, result).await
    }

    pub async fn create_staff(&self) -> Result<Staff, ClientError> {
        let (key, payload): (EntityKey, StaffPayload) = self
            .stage_create(|state, business| {
                let payload = state.staff_form.to_payload(business)?;
                let now = Utc::now();
                let provisional = Staff {
                    id: Uuid::nil(),
                    business,
                    name: payload.name.clone().unwrap_or_default(),
                    phone: payload.phone.clone().unwrap_or_default(),
                    email: payload.email.clone(),
                    role: payload
                        .role
                        .as_deref()
                        .and_then(|r| r.parse::<StaffRole>().ok())
                        .unwrap_or_default(),
                    schedule: json!({}),
                    photo_url: None,
                    is_active: true,
                    hire_date: None,
                    created_at: now,
                    updated_at: now,
                };
                state.staff_form = StaffForm::default();
                state.show_staff_modal = false;
                Ok((payload, provisional))
            })
            .await?;

        let result = self.api.create_staff(&payload).await;
        self.commit_create(key, result).await
    }

    pub async fn create_service(&self) -> Result<Service, ClientError> {
        let (key, payload): (EntityKey, ServicePayload) = self
            .stage_create(|state, business| {
                let payload = state.service_form.to_payload(business)?;
                let now = Utc::now();
                let provisional = Service {
                    id: Uuid::nil(),
                    business,
                    name: payload.name.clone().unwrap_or_default(),
                    description: payload.description.clone(),
                    price: payload.price.unwrap_or_default(),
                    duration: payload.duration.unwrap_or_default(),
                    is_active: true,
                    category: None,
                    created_at: now,
                    updated_at: now,
                };
                state.service_form = ServiceForm::default();
                state.show_service_modal = false;
                Ok((payload, provisional))
            })
            .await?;

        let result = self.api.create_service(&payload).await;
        self.commit_create(key, result).await
    }

    /// O provisório usa os nomes e o preço já em cache; o servidor devolve
    /// os valores definitivos.
    pub async fn create_appointment(&self) -> Result<Appointment, ClientError> {
        let (key, payload): (EntityKey, AppointmentPayload) = self
            .stage_create(|state, business| {
                let payload = state.appointment_form.to_payload(business)?;
                let staff = payload.staff.unwrap_or_default();
                let customer = payload.customer.unwrap_or_default();
                let service = payload.service.and_then(|id| state.service(id).cloned());
                let now = Utc::now();
                let provisional = Appointment {
                    id: Uuid::nil(),
                    business,
                    staff,
                    customer,
                    service: payload.service,
                    staff_name: state.staff_name(staff).unwrap_or_default(),
                    customer_name: state.customer_name(customer).unwrap_or_default(),
                    service_name: service.as_ref().map(|s| s.name.clone()),
                    scheduled_at: payload.scheduled_at.unwrap_or(now),
                    status: AppointmentStatus::default(),
                    price: service.map(|s| s.price).unwrap_or(Decimal::ZERO),
                    notes: None,
                    created_at: now,
                    updated_at: now,
                    completed_at: None,
                };
                state.appointment_form = AppointmentForm::default();
                state.show_appointment_modal = false;
                Ok((payload, provisional))
            })
            .await?;

        let result = self.api.create_appointment(&payload).await;
        self.commit_create(key, result).await
    }

    // Passos 1-3: valida o formulário, insere o provisório no topo e limpa o
    // formulário. Erro de validação não toca na lista nem vai à rede.
    async fn stage_create<T, P>(
        &self,
        build: impl FnOnce(&mut ClientState, Uuid) -> Result<(P, T), ClientError>,
    ) -> Result<(EntityKey, P), ClientError>
    where
        T: Cached,
    {
        let mut state = self.state.lock().await;
        let Some(business) = state.selected_business else {
            let err = ClientError::field("business", "Select a business first.");
            state.fail(err.display_message());
            return Err(err);
        };

        let (payload, provisional) = match build(&mut *state, business) {
            Ok(built) => built,
            Err(e) => {
                state.fail(e.display_message());
                return Err(e);
            }
        };

        let key = state.next_pending_key();
        let (list, count) = T::slot(&mut *state);
        list.prepend(key, provisional);
        *count += 1;
        state.succeed(format!("{} created successfully!", T::LABEL));
        Ok((key, payload))
    }

    // Passos 5-6: troca o provisório pelo registro do servidor, na mesma
    // posição, ou remove e desconta.
    async fn commit_create<T: Cached>(
        &self,
        key: EntityKey,
        result: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut state = self.state.lock().await;
        match result {
            Ok(entity) => {
                let (list, _) = T::slot(&mut *state);
                list.rekey(key, entity.key(), entity.clone());
                Ok(entity)
            }
            Err(e) => {
                let (list, count) = T::slot(&mut *state);
                // Ausente: a lista foi recarregada nesse meio tempo
                if list.remove(&key).is_some() {
                    *count = count.saturating_sub(1);
                }
                let message = format!(
                    "Error creating {}: {}",
                    T::LABEL.to_lowercase(),
                    e.display_message()
                );
                self.report(&mut state, &e, message);
                Err(e)
            }
        }
    }

    // ---
    // Remoção otimista
    // ---

    pub async fn delete_customer(&self, id: Uuid) -> Result<(), ClientError> {
        let staged = self.stage_delete::<Customer>(id).await?;
        let result = self.api.delete_customer(id).await;
        self.commit_delete(staged, result).await
    }

    pub async fn delete_staff(&self, id: Uuid) -> Result<(), ClientError> {
        let staged = self.stage_delete::<Staff>(id).await?;
        let result = self.api.delete_staff(id).await;
        self.commit_delete(staged, result).await
    }

    pub async fn delete_service(&self, id: Uuid) -> Result<(), ClientError> {
        let staged = self.stage_delete::<Service>(id).await?;
        let result = self.api.delete_service(id).await;
        self.commit_delete(staged, result).await
    }

    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), ClientError> {
        let staged = self.stage_delete::<Appointment>(id).await?;
        let result = self.api.delete_appointment(id).await;
        self.commit_delete(staged, result).await
    }

    async fn stage_delete<T: Cached>(&self, id: Uuid) -> Result<StagedDelete<T>, ClientError> {
        let mut state = self.state.lock().await;
        let business = state.selected_business;
        let key = EntityKey::Server(id);

        let (list, count) = T::slot(&mut *state);
        let Some(record) = list.remove(&key) else {
            let err = ClientError::NotFound;
            state.fail(format!(
                "Error deleting {}: {}",
                T::LABEL.to_lowercase(),
                err.display_message()
            ));
            return Err(err);
        };
        *count = count.saturating_sub(1);
        state.succeed(format!("{} deleted successfully!", T::LABEL));

        Ok(StagedDelete {
            key,
            record,
            business,
        })
    }

    // Falha: o registro volta no fim da lista e o contador é restaurado
    async fn commit_delete<T: Cached>(
        &self,
        staged: StagedDelete<T>,
        result: Result<(), ClientError>,
    ) -> Result<(), ClientError> {
        let Err(e) = result else {
            return Ok(());
        };

        let mut state = self.state.lock().await;
        if state.selected_business == staged.business {
            let (list, count) = T::slot(&mut *state);
            if !list.contains(&staged.key) {
                list.push_back(staged.key, staged.record);
                *count += 1;
            }
        }
        let message = format!(
            "Error deleting {}: {}",
            T::LABEL.to_lowercase(),
            e.display_message()
        );
        self.report(&mut state, &e, message);
        Err(e)
    }

    // ---
    // Status de agendamento (atualização no lugar)
    // ---

    pub async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        let key = EntityKey::Server(id);
        let previous = {
            let mut state = self.state.lock().await;
            let Some(appointment) = state.appointments.get_mut(&key) else {
                let err = ClientError::NotFound;
                state.fail(format!("Error updating appointment: {}", err.display_message()));
                return Err(err);
            };
            let previous = appointment.status;
            appointment.status = status;
            state.succeed(format!("Appointment marked as {status}."));
            previous
        };

        let result = self.api.update_appointment_status(id, status).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(server) => {
                if let Some(appointment) = state.appointments.get_mut(&key) {
                    *appointment = server.clone();
                }
                Ok(server)
            }
            Err(e) => {
                // Só desfaz se ninguém mexeu no status depois desta operação
                if let Some(appointment) = state.appointments.get_mut(&key) {
                    if appointment.status == status {
                        appointment.status = previous;
                    }
                }
                let message = format!("Error updating appointment: {}", e.display_message());
                self.report(&mut state, &e, message);
                Err(e)
            }
        }
    }
}

// O que a remoção capturou antes de ir à rede
struct StagedDelete<T> {
    key: EntityKey,
    record: T,
    business: Option<Uuid>,
}
