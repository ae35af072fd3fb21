// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::apply;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    // Flag administrativa: enxerga todas as barbearias, como o master
    pub is_staff: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Perfil 1:1 com o usuário. Nunca existe sozinho.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Profile {
    pub user_id: i64,
    pub is_master: bool,
    pub phone: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Usuário + perfil, sempre carregados juntos.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub user: User,
    pub profile: Profile,
}

impl UserAccount {
    pub fn apply_changes(&mut self, changes: UpdateMePayload) {
        apply(&mut self.user.first_name, changes.first_name);
        apply(&mut self.user.last_name, changes.last_name);
        apply(&mut self.user.email, changes.email);
        apply(&mut self.profile.phone, changes.phone);
        apply(&mut self.profile.avatar_url, changes.avatar_url);
    }
}

/// Dados necessários para criar usuário + perfil numa tacada só.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummary {
    pub is_master: bool,
    pub phone: String,
    pub avatar_url: Option<String>,
}

// O que a API devolve sobre o usuário (nunca o hash da senha)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: ProfileSummary,
    pub is_master: bool,
}

impl From<&UserAccount> for UserSummary {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.user.id,
            username: account.user.username.clone(),
            email: account.user.email.clone(),
            first_name: account.user.first_name.clone(),
            last_name: account.user.last_name.clone(),
            profile: ProfileSummary {
                is_master: account.profile.is_master,
                phone: account.profile.phone.clone(),
                avatar_url: account.profile.avatar_url.clone(),
            },
            is_master: account.profile.is_master,
        }
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, max = 150, message = "required"))]
    #[schema(example = "newuser")]
    pub username: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "user@example.com")]
    pub email: String,

    // Senhas diferentes são reportadas no campo `password`
    #[validate(
        length(min = 8, message = "password_too_short"),
        must_match(other = "password2", message = "password_mismatch")
    )]
    pub password: String,

    pub password2: String,

    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "invalid_length"))]
    pub phone: Option<String>,
}

// Dados para login
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "required"))]
    pub username: String,
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshPayload {
    #[validate(length(min = 1, message = "required"))]
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "password_too_short"))]
    pub new_password: String,
}

// PATCH /api/auth/me
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "invalid_length"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(url(message = "invalid_url"))]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,
}

// Resposta de autenticação com o par de tokens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserSummary,
    pub access: String,
    pub refresh: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
    pub token_type: TokenType,
}
