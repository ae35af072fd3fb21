// src/client/state.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    client::{
        error::ClientError,
        list::{EntityKey, EntityList},
    },
    models::{
        appointment::{Appointment, AppointmentPayload},
        auth::UserSummary,
        business::Business,
        customer::{Customer, CustomerPayload},
        service::{Service, ServicePayload},
        staff::{Staff, StaffPayload, StaffRole},
    },
};

// ---
// Rascunhos dos formulários (texto cru, como digitado)
// ---

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
}

impl Default for StaffForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            role: StaffRole::default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentForm {
    pub customer: String,
    pub staff: String,
    pub service: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, interpretado como UTC
    pub time: String,
}

fn required(value: &str, field: &str) -> Result<String, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::field(field, "This field is required."));
    }
    Ok(value.to_string())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn uuid(value: &str, field: &str) -> Result<Uuid, ClientError> {
    required(value, field)?
        .parse()
        .map_err(|_| ClientError::field(field, "Select a valid option."))
}

impl CustomerForm {
    pub fn to_payload(&self, business: Uuid) -> Result<CustomerPayload, ClientError> {
        Ok(CustomerPayload {
            business: Some(business),
            name: Some(required(&self.name, "name")?),
            phone: Some(required(&self.phone, "phone")?),
            email: optional(&self.email),
            ..Default::default()
        })
    }
}

impl StaffForm {
    pub fn to_payload(&self, business: Uuid) -> Result<StaffPayload, ClientError> {
        let role = optional(&self.role).unwrap_or_else(|| StaffRole::default().to_string());
        if role.parse::<StaffRole>().is_err() {
            return Err(ClientError::field("role", "Select a valid option."));
        }
        Ok(StaffPayload {
            business: Some(business),
            name: Some(required(&self.name, "name")?),
            phone: Some(required(&self.phone, "phone")?),
            email: optional(&self.email),
            role: Some(role),
            ..Default::default()
        })
    }
}

impl ServiceForm {
    pub fn to_payload(&self, business: Uuid) -> Result<ServicePayload, ClientError> {
        let name = required(&self.name, "name")?;
        let price: Decimal = required(&self.price, "price")?
            .parse()
            .map_err(|_| ClientError::field("price", "Enter a valid number."))?;
        let duration: i32 = required(&self.duration, "duration")?
            .parse()
            .map_err(|_| ClientError::field("duration", "Enter a whole number of minutes."))?;

        Ok(ServicePayload {
            business: Some(business),
            name: Some(name),
            description: optional(&self.description),
            price: Some(price),
            duration: Some(duration),
            ..Default::default()
        })
    }
}

impl AppointmentForm {
    pub fn to_payload(&self, business: Uuid) -> Result<AppointmentPayload, ClientError> {
        let customer = uuid(&self.customer, "customer")?;
        let staff = uuid(&self.staff, "staff")?;
        let service = match optional(&self.service) {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| ClientError::field("service", "Select a valid option."))?,
            ),
            None => None,
        };

        let date = NaiveDate::parse_from_str(&required(&self.date, "date")?, "%Y-%m-%d")
            .map_err(|_| ClientError::field("date", "Use the YYYY-MM-DD format."))?;
        let time = NaiveTime::parse_from_str(&required(&self.time, "time")?, "%H:%M")
            .map_err(|_| ClientError::field("time", "Use the HH:MM format."))?;
        let scheduled_at: DateTime<Utc> = date.and_time(time).and_utc();

        Ok(AppointmentPayload {
            business: Some(business),
            staff: Some(staff),
            customer: Some(customer),
            service,
            scheduled_at: Some(scheduled_at),
            ..Default::default()
        })
    }
}

/// Tudo que o painel exibe. Fica atrás de um `tokio::sync::Mutex` no
/// [`ClientSession`](crate::client::ClientSession) e nunca é travado
/// durante uma chamada de rede.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    // Autenticação
    pub user: Option<UserSummary>,
    pub is_authenticated: bool,
    pub is_master: bool,
    pub auth_error: Option<String>,
    pub auth_loading: bool,

    pub businesses: Vec<Business>,
    pub selected_business: Option<Uuid>,

    pub customers: EntityList<Customer>,
    pub staff: EntityList<Staff>,
    pub services: EntityList<Service>,
    pub appointments: EntityList<Appointment>,

    // Contadores exibidos nos cards
    pub total_customers: usize,
    pub total_staff: usize,
    pub total_services: usize,
    pub total_appointments: usize,

    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    pub customer_form: CustomerForm,
    pub staff_form: StaffForm,
    pub service_form: ServiceForm,
    pub appointment_form: AppointmentForm,

    pub show_customer_modal: bool,
    pub show_staff_modal: bool,
    pub show_service_modal: bool,
    pub show_appointment_modal: bool,

    next_pending: u64,
}

impl ClientState {
    /// Próxima chave provisória (espaço separado dos ids do servidor).
    pub fn next_pending_key(&mut self) -> EntityKey {
        self.next_pending += 1;
        EntityKey::Pending(self.next_pending)
    }

    /// Volta ao estado inicial (logout). O contador de chaves provisórias
    /// continua: criações ainda em voo não podem colidir com as novas.
    pub fn reset(&mut self) {
        let next_pending = self.next_pending;
        *self = Self::default();
        self.next_pending = next_pending;
    }

    /// Sessão expirada (401): volta para a tela de login.
    pub fn expire_session(&mut self, message: String) {
        self.is_authenticated = false;
        self.user = None;
        self.is_master = false;
        self.auth_error = Some(message);
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    /// Mensagem de falha substitui qualquer mensagem de sucesso otimista.
    pub fn fail(&mut self, message: String) {
        self.success_message = None;
        self.error_message = Some(message);
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.error_message = None;
        self.success_message = Some(message.into());
    }

    /// Sai da barbearia atual: as listas ficam vazias até o próximo load.
    pub fn reset_business_data(&mut self) {
        self.customers = EntityList::new();
        self.staff = EntityList::new();
        self.services = EntityList::new();
        self.appointments = EntityList::new();
        self.total_customers = 0;
        self.total_staff = 0;
        self.total_services = 0;
        self.total_appointments = 0;
    }

    pub fn customer_name(&self, id: Uuid) -> Option<String> {
        self.customers
            .get(&EntityKey::Server(id))
            .map(|c| c.name.clone())
    }

    pub fn staff_name(&self, id: Uuid) -> Option<String> {
        self.staff.get(&EntityKey::Server(id)).map(|s| s.name.clone())
    }

    pub fn service(&self, id: Uuid) -> Option<&Service> {
        self.services.get(&EntityKey::Server(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_form_requires_name_and_phone() {
        let form = CustomerForm {
            name: "  ".into(),
            phone: "555-0101".into(),
            email: String::new(),
        };
        let err = form.to_payload(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref fields, .. } if fields.contains_key("name")));
    }

    #[test]
    fn appointment_form_combines_date_and_time() {
        let customer = Uuid::new_v4();
        let staff = Uuid::new_v4();
        let form = AppointmentForm {
            customer: customer.to_string(),
            staff: staff.to_string(),
            service: String::new(),
            date: "2025-03-14".into(),
            time: "09:30".into(),
        };
        let payload = form.to_payload(Uuid::new_v4()).unwrap();
        assert_eq!(payload.customer, Some(customer));
        assert_eq!(payload.service, None);
        assert_eq!(
            payload.scheduled_at.map(|d| d.to_rfc3339()),
            Some("2025-03-14T09:30:00+00:00".to_string())
        );
    }

    #[test]
    fn service_form_rejects_non_numeric_price() {
        let form = ServiceForm {
            name: "Fade".into(),
            description: String::new(),
            price: "cheap".into(),
            duration: "30".into(),
        };
        assert!(matches!(
            form.to_payload(Uuid::new_v4()),
            Err(ClientError::Validation { ref fields, .. }) if fields.contains_key("price")
        ));
    }

    #[test]
    fn pending_keys_never_repeat() {
        let mut state = ClientState::default();
        let a = state.next_pending_key();
        let b = state.next_pending_key();
        assert_ne!(a, b);
        assert!(a.is_pending());
    }

    #[test]
    fn reset_keeps_the_pending_counter() {
        let mut state = ClientState::default();
        let before = state.next_pending_key();
        state.is_authenticated = true;
        state.selected_business = Some(Uuid::new_v4());

        state.reset();

        assert!(!state.is_authenticated);
        assert_eq!(state.selected_business, None);
        assert_ne!(state.next_pending_key(), before);
    }
}
