pub mod appointment_service;
pub mod auth;
pub mod business_service;
pub mod catalog_service;
pub mod customer_service;
pub mod scope;
pub mod staff_service;

pub use appointment_service::AppointmentService;
pub use auth::AuthService;
pub use business_service::BusinessService;
pub use catalog_service::CatalogService;
pub use customer_service::CustomerService;
pub use staff_service::StaffService;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EntityStore,
    models::business::Business,
    services::scope::Scope,
};

/// A barbearia referenciada existe e está no escopo? Fora do escopo é
/// tratado exatamente como inexistente.
pub(crate) async fn business_in_scope(
    businesses: &dyn EntityStore<Business>,
    scope: &Scope,
    business_id: Uuid,
) -> Result<bool, AppError> {
    Ok(businesses.find(scope, business_id).await?.is_some())
}
