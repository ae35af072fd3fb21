// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use validator::ValidationErrors;

use crate::{
    common::{
        error::{AppError, field_error},
        validation::{collect, finish},
    },
    db::UserStore,
    models::auth::{
        AccessResponse, AuthResponse, ChangePasswordPayload, Claims, LoginUserPayload, NewUser,
        RegisterUserPayload, TokenType, UpdateMePayload, UserAccount, UserSummary,
    },
};

/// Parâmetros de emissão de token e custo do bcrypt (vêm do `Settings`).
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    config: Arc<AuthConfig>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<AuthResponse, AppError> {
        let mut errors: ValidationErrors = collect(&payload);
        if payload.username.trim().is_empty() {
            errors.add("username", validator::ValidationError::new("required"));
        }
        finish(errors)?;

        // Conferência amigável antes do INSERT; a constraint cobre a corrida
        if self.users.find_user_by_username(&payload.username).await?.is_some() {
            return Err(field_error("username", "unique"));
        }
        if self.users.find_user_by_email(&payload.email).await?.is_some() {
            return Err(field_error("email", "unique"));
        }

        let password_hash = self.hash_password(payload.password).await?;

        let account = self
            .users
            .create_user(NewUser {
                username: payload.username,
                email: payload.email,
                first_name: payload.first_name.unwrap_or_default(),
                last_name: payload.last_name.unwrap_or_default(),
                password_hash,
                phone: payload.phone.unwrap_or_default(),
            })
            .await?;

        tracing::info!("🙋 Usuário {} registrado", account.user.username);
        self.token_pair(&account)
    }

    pub async fn login_user(&self, payload: LoginUserPayload) -> Result<AuthResponse, AppError> {
        finish(collect(&payload))?;

        let account = self
            .users
            .find_user_by_username(&payload.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self
            .verify_password(payload.password, account.user.password_hash.clone())
            .await?
        {
            return Err(AppError::InvalidCredentials);
        }

        self.token_pair(&account)
    }

    /// Troca um refresh token válido por um novo access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessResponse, AppError> {
        let claims = self.decode_token(refresh_token, TokenType::Refresh)?;
        // Usuário apagado depois da emissão
        let account = self
            .users
            .find_user_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(AccessResponse {
            access: self.create_token(account.user.id, TokenType::Access)?,
        })
    }

    /// Valida um access token e recarrega o usuário do banco.
    pub async fn validate_token(&self, token: &str) -> Result<UserAccount, AppError> {
        let claims = self.decode_token(token, TokenType::Access)?;
        self.users
            .find_user_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub async fn update_me(
        &self,
        mut account: UserAccount,
        payload: UpdateMePayload,
    ) -> Result<UserAccount, AppError> {
        finish(collect(&payload))?;

        if let Some(email) = payload.email.as_deref() {
            let taken = self
                .users
                .find_user_by_email(email)
                .await?
                .is_some_and(|other| other.user.id != account.user.id);
            if taken {
                return Err(field_error("email", "unique"));
            }
        }

        account.apply_changes(payload);
        self.users.update_user(&account).await
    }

    pub async fn change_password(
        &self,
        account: &UserAccount,
        payload: ChangePasswordPayload,
    ) -> Result<(), AppError> {
        finish(collect(&payload))?;

        let matches = self
            .verify_password(payload.old_password, account.user.password_hash.clone())
            .await?;
        if !matches {
            return Err(field_error("old_password", "wrong_password"));
        }

        let password_hash = self.hash_password(payload.new_password).await?;
        self.users.set_password(account.user.id, &password_hash).await?;

        tracing::info!("🔑 Senha alterada para {}", account.user.username);
        Ok(())
    }

    fn token_pair(&self, account: &UserAccount) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            user: UserSummary::from(account),
            access: self.create_token(account.user.id, TokenType::Access)?,
            refresh: self.create_token(account.user.id, TokenType::Refresh)?,
            message: None,
        })
    }

    // Executa o bcrypt num thread separado
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.config.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: String, password_hash: String) -> Result<bool, AppError> {
        let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        Ok(is_valid)
    }

    fn create_token(&self, user_id: i64, token_type: TokenType) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.config.access_ttl,
            TokenType::Refresh => self.config.refresh_ttl,
        };

        let claims = Claims {
            sub: user_id,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            token_type,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?)
    }

    fn decode_token(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Um refresh nunca serve como access (e vice-versa)
        if token_data.claims.token_type != expected {
            return Err(AppError::InvalidToken);
        }
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryStore::new()),
            AuthConfig {
                jwt_secret: "test-secret".into(),
                access_ttl: Duration::minutes(5),
                refresh_ttl: Duration::days(1),
                bcrypt_cost: 4,
            },
        )
    }

    fn registration(username: &str) -> RegisterUserPayload {
        RegisterUserPayload {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "securepassword123".into(),
            password2: "securepassword123".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_usable_tokens() {
        let auth = service();
        let registered = auth.register_user(registration("newuser")).await.unwrap();
        assert_eq!(registered.user.username, "newuser");
        assert!(!registered.user.is_master);

        let login = auth
            .login_user(LoginUserPayload {
                username: "newuser".into(),
                password: "securepassword123".into(),
            })
            .await
            .unwrap();

        let account = auth.validate_token(&login.access).await.unwrap();
        assert_eq!(account.user.username, "newuser");
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let auth = service();
        let tokens = auth.register_user(registration("alice")).await.unwrap();

        assert!(matches!(
            auth.validate_token(&tokens.refresh).await,
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            auth.refresh(&tokens.access).await,
            Err(AppError::InvalidToken)
        ));

        let renewed = auth.refresh(&tokens.refresh).await.unwrap();
        assert!(auth.validate_token(&renewed.access).await.is_ok());
    }

    #[tokio::test]
    async fn mismatched_passwords_are_reported_on_password() {
        let auth = service();
        let mut payload = registration("bob");
        payload.password2 = "somethingelse1".into();

        let Err(AppError::ValidationError(errors)) = auth.register_user(payload).await else {
            panic!("expected a validation error");
        };
        assert!(errors.field_errors().contains_key("password"));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_field_error() {
        let auth = service();
        auth.register_user(registration("carol")).await.unwrap();

        let mut payload = registration("carol2");
        payload.email = "carol@example.com".into();
        let Err(AppError::ValidationError(errors)) = auth.register_user(payload).await else {
            panic!("expected a validation error");
        };
        assert!(errors.field_errors().contains_key("email"));
    }

    #[tokio::test]
    async fn wrong_password_fails_login_and_password_change() {
        let auth = service();
        let tokens = auth.register_user(registration("dave")).await.unwrap();

        let login = auth
            .login_user(LoginUserPayload {
                username: "dave".into(),
                password: "not-the-password".into(),
            })
            .await;
        assert!(matches!(login, Err(AppError::InvalidCredentials)));

        let account = auth.validate_token(&tokens.access).await.unwrap();
        let change = auth
            .change_password(
                &account,
                ChangePasswordPayload {
                    old_password: "not-the-password".into(),
                    new_password: "brandnewpassword".into(),
                },
            )
            .await;
        let Err(AppError::ValidationError(errors)) = change else {
            panic!("expected a validation error");
        };
        assert!(errors.field_errors().contains_key("old_password"));
    }
}
