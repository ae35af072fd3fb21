//! CRM multi-barbearia: API REST (axum + sqlx) e o estado do cliente com
//! mutações otimistas.

pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::identify};

/// Monta o router completo da aplicação.
pub fn app(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh));

    // Daqui para baixo o principal é identificado pelo Bearer (ou anônimo)
    let identified_routes = Router::new()
        .route(
            "/auth/me",
            get(handlers::auth::get_me).patch(handlers::auth::update_me),
        )
        .route("/auth/change-password", post(handlers::auth::change_password))
        .route("/auth/check", get(handlers::auth::check))
        .route(
            "/businesses",
            get(handlers::businesses::list_businesses).post(handlers::businesses::create_business),
        )
        .route(
            "/businesses/{id}",
            get(handlers::businesses::get_business)
                .put(handlers::businesses::update_business)
                .patch(handlers::businesses::patch_business)
                .delete(handlers::businesses::delete_business),
        )
        .route(
            "/staff",
            get(handlers::staff::list_staff).post(handlers::staff::create_staff_member),
        )
        .route(
            "/staff/{id}",
            get(handlers::staff::get_staff_member)
                .put(handlers::staff::update_staff_member)
                .patch(handlers::staff::patch_staff_member)
                .delete(handlers::staff::delete_staff_member),
        )
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .patch(handlers::customers::patch_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/services",
            get(handlers::services::list_services).post(handlers::services::create_service),
        )
        .route(
            "/services/{id}",
            get(handlers::services::get_service)
                .put(handlers::services::update_service)
                .patch(handlers::services::patch_service)
                .delete(handlers::services::delete_service),
        )
        .route(
            "/appointments",
            get(handlers::appointments::list_appointments)
                .post(handlers::appointments::create_appointment),
        )
        .route(
            "/appointments/{id}",
            get(handlers::appointments::get_appointment)
                .put(handlers::appointments::update_appointment)
                .patch(handlers::appointments::patch_appointment)
                .delete(handlers::appointments::delete_appointment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            identify,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/healthz", get(handlers::health::healthz))
        .route("/livez", get(handlers::health::livez))
        .route("/readyz", get(handlers::health::readyz))
        .nest("/api", identified_routes.merge(auth_routes))
        .with_state(app_state)
}
