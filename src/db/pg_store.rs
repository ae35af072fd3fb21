// src/db/pg_store.rs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{common::error::AppError, db::store::Store, services::scope::Scope};

// Adaptador Postgres. As implementações de cada entidade ficam nos
// arquivos *_repo.rs vizinhos.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(Self::new(pool))
    }

    /// Roda as migrações embutidas no binário.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao rodar as migrações: {e}"))?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
        Ok(())
    }
}

/// Traduz o escopo para os parâmetros `($1 OR b.owner_id = $2)` usados nas
/// queries. `None` significa escopo vazio: nem vale a pena ir ao banco.
pub(crate) fn scope_params(scope: &Scope) -> Option<(bool, i64)> {
    match scope {
        Scope::None => None,
        Scope::All => Some((true, 0)),
        Scope::OwnedBy(user_id) => Some((false, *user_id)),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_becomes_query_parameters() {
        assert_eq!(scope_params(&Scope::None), None);
        assert_eq!(scope_params(&Scope::All), Some((true, 0)));
        assert_eq!(scope_params(&Scope::OwnedBy(9)), Some((false, 9)));
    }
}
