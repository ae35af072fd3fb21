// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;
use chrono::Duration;

use crate::{
    common::i18n::I18nStore,
    db::{EntityStore, MemoryStore, PgStore, Store, UserStore},
    models::{
        appointment::Appointment, business::Business, customer::Customer, service::Service,
        staff::Staff,
    },
    services::{
        AppointmentService, AuthService, BusinessService, CatalogService, CustomerService,
        StaffService, auth::AuthConfig,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Ausente: sobe com o backend em memória.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            jwt_secret,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            access_ttl_minutes: parse_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", 60)?,
            refresh_ttl_days: parse_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", 7)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_ttl: Duration::minutes(self.access_ttl_minutes),
            refresh_ttl: Duration::days(self.refresh_ttl_days),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválido: {raw:?}")),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub businesses: BusinessService,
    pub staff: StaffService,
    pub customers: CustomerService,
    pub catalog: CatalogService,
    pub appointments: AppointmentService,
    pub auth: AuthService,
    pub store: Arc<dyn Store>,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    /// Conecta no Postgres (rodando as migrações) ou, sem DATABASE_URL,
    /// cai no backend em memória.
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let auth_config = settings.auth_config();
        match settings.database_url.as_deref() {
            Some(url) => {
                let store = PgStore::connect(url, settings.db_max_connections).await?;
                store.migrate().await?;
                Ok(Self::from_store(Arc::new(store), auth_config))
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL ausente: usando armazenamento em memória (dados se perdem ao reiniciar)");
                Ok(Self::from_store(Arc::new(MemoryStore::new()), auth_config))
            }
        }
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_store<S: Store>(store: Arc<S>, auth_config: AuthConfig) -> Self {
        let businesses: Arc<dyn EntityStore<Business>> = store.clone();
        let staff: Arc<dyn EntityStore<Staff>> = store.clone();
        let customers: Arc<dyn EntityStore<Customer>> = store.clone();
        let services: Arc<dyn EntityStore<Service>> = store.clone();
        let appointments: Arc<dyn EntityStore<Appointment>> = store.clone();
        let users: Arc<dyn UserStore> = store.clone();

        Self {
            businesses: BusinessService::new(businesses.clone()),
            staff: StaffService::new(staff.clone(), businesses.clone()),
            customers: CustomerService::new(customers.clone(), businesses.clone()),
            catalog: CatalogService::new(services.clone(), businesses.clone()),
            appointments: AppointmentService::new(
                appointments,
                businesses,
                staff,
                customers,
                services,
            ),
            auth: AuthService::new(users, auth_config),
            store,
            i18n_store: Arc::new(I18nStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let settings = settings(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.bind_addr, "0.0.0.0:3000");
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.auth_config().access_ttl, Duration::minutes(60));
        assert_eq!(settings.auth_config().refresh_ttl, Duration::days(7));
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(settings(&[("DATABASE_URL", "postgres://localhost/crm")]).is_err());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = settings(&[("JWT_SECRET", "s"), ("DB_MAX_CONNECTIONS", "many")]);
        assert!(result.is_err());
    }
}
