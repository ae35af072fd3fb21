// src/db/store.rs
//
// Portas de persistência. O Postgres (PgStore) é o adaptador de produção;
// o MemoryStore atende testes e o modo sem DATABASE_URL.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        appointment::{Appointment, AppointmentStatus},
        auth::{NewUser, UserAccount},
        business::Business,
        customer::Customer,
        service::Service,
        staff::Staff,
    },
    services::scope::Scope,
};

/// Filtros de query string aceitos pelas listagens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Ignorado na listagem de barbearias.
    pub business: Option<Uuid>,
    /// Só faz sentido para agendamentos.
    pub status: Option<AppointmentStatus>,
}

/// CRUD de uma entidade pendurada numa barbearia, sempre recortado pelo escopo.
///
/// `insert` não confere escopo: quem chama já validou as referências. O valor
/// devolvido traz os campos derivados (`owner_username`, `staff_name`, ...).
/// `update` grava a linha inteira e renova `updated_at`; devolve `None` se a
/// linha não existe ou saiu do escopo.
#[async_trait]
pub trait EntityStore<T>: Send + Sync {
    async fn list(&self, scope: &Scope, filter: &ListFilter) -> Result<Vec<T>, AppError>;

    async fn find(&self, scope: &Scope, id: Uuid) -> Result<Option<T>, AppError>;

    async fn insert(&self, entity: &T) -> Result<T, AppError>;

    async fn update(&self, scope: &Scope, entity: &T) -> Result<Option<T>, AppError>;

    async fn delete(&self, scope: &Scope, id: Uuid) -> Result<bool, AppError>;
}

/// Contas de usuário. Usuário e perfil são sempre gravados juntos.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Cria usuário + perfil numa única transação.
    async fn create_user(&self, new_user: NewUser) -> Result<UserAccount, AppError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<UserAccount>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError>;

    /// Grava nome, e-mail e os campos editáveis do perfil.
    async fn update_user(&self, account: &UserAccount) -> Result<UserAccount, AppError>;

    async fn set_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError>;

    /// Promove/rebaixa um master. Não existe rota para isso.
    async fn set_master(&self, user_id: i64, is_master: bool) -> Result<(), AppError>;
}

/// Tudo que o `AppState` precisa de um backend de persistência.
#[async_trait]
pub trait Store:
    EntityStore<Business>
    + EntityStore<Staff>
    + EntityStore<Customer>
    + EntityStore<Service>
    + EntityStore<Appointment>
    + UserStore
    + 'static
{
    /// Usado pelo /readyz.
    async fn ping(&self) -> Result<(), AppError>;
}
