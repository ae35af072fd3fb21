// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::check,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_me,
        handlers::auth::change_password,

        // --- Businesses ---
        handlers::businesses::list_businesses,
        handlers::businesses::get_business,
        handlers::businesses::create_business,
        handlers::businesses::update_business,
        handlers::businesses::patch_business,
        handlers::businesses::delete_business,

        // --- Staff ---
        handlers::staff::list_staff,
        handlers::staff::get_staff_member,
        handlers::staff::create_staff_member,
        handlers::staff::update_staff_member,
        handlers::staff::patch_staff_member,
        handlers::staff::delete_staff_member,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::patch_customer,
        handlers::customers::delete_customer,

        // --- Services ---
        handlers::services::list_services,
        handlers::services::get_service,
        handlers::services::create_service,
        handlers::services::update_service,
        handlers::services::patch_service,
        handlers::services::delete_service,

        // --- Appointments ---
        handlers::appointments::list_appointments,
        handlers::appointments::get_appointment,
        handlers::appointments::create_appointment,
        handlers::appointments::update_appointment,
        handlers::appointments::patch_appointment,
        handlers::appointments::delete_appointment,

        // --- Health ---
        handlers::health::healthz,
        handlers::health::livez,
        handlers::health::readyz,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserSummary,
            models::auth::ProfileSummary,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::RefreshPayload,
            models::auth::ChangePasswordPayload,
            models::auth::UpdateMePayload,
            models::auth::AuthResponse,
            models::auth::AccessResponse,
            models::auth::MessageResponse,
            models::auth::CheckAuthResponse,

            // --- Barbearia ---
            models::business::Business,
            models::business::BusinessPayload,
            models::business::BusinessChanges,
            models::staff::StaffRole,
            models::staff::Staff,
            models::staff::StaffPayload,
            models::staff::StaffChanges,
            models::customer::Customer,
            models::customer::CustomerPayload,
            models::customer::CustomerChanges,
            models::service::Service,
            models::service::ServicePayload,
            models::service::ServiceChanges,
            models::appointment::AppointmentStatus,
            models::appointment::Appointment,
            models::appointment::AppointmentPayload,
            models::appointment::AppointmentChanges,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Businesses", description = "Barbearias (escopo de dados de cada dono)"),
        (name = "Staff", description = "Profissionais da barbearia"),
        (name = "Customers", description = "Clientes"),
        (name = "Services", description = "Catálogo de serviços e preços"),
        (name = "Appointments", description = "Agenda"),
        (name = "Health", description = "Sondas de liveness e readiness")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/businesses",
            "/api/staff/{id}",
            "/api/customers",
            "/api/services/{id}",
            "/api/appointments",
            "/api/auth/me",
            "/readyz",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
