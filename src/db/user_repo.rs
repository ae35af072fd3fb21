// src/db/user_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::pg_store::PgStore;
use crate::{
    common::error::AppError,
    db::store::UserStore,
    models::auth::{NewUser, Profile, User, UserAccount},
};

// Linha achatada do JOIN users + user_profiles
#[derive(FromRow)]
struct UserAccountRow {
    id: i64,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    is_staff: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_master: bool,
    phone: String,
    avatar_url: Option<String>,
    profile_created_at: DateTime<Utc>,
    profile_updated_at: DateTime<Utc>,
}

impl From<UserAccountRow> for UserAccount {
    fn from(row: UserAccountRow) -> Self {
        UserAccount {
            user: User {
                id: row.id,
                username: row.username,
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
                password_hash: row.password_hash,
                is_staff: row.is_staff,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            profile: Profile {
                user_id: row.id,
                is_master: row.is_master,
                phone: row.phone,
                avatar_url: row.avatar_url,
                created_at: row.profile_created_at,
                updated_at: row.profile_updated_at,
            },
        }
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT
        u.id, u.username, u.email, u.first_name, u.last_name,
        u.password_hash, u.is_staff, u.created_at, u.updated_at,
        p.is_master, p.phone, p.avatar_url,
        p.created_at AS profile_created_at,
        p.updated_at AS profile_updated_at
    FROM users u
    JOIN user_profiles p ON p.user_id = u.id
"#;

impl PgStore {
    async fn fetch_account(&self, condition: &str, value: &str) -> Result<Option<UserAccount>, AppError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE {condition}");
        let row = sqlx::query_as::<_, UserAccountRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserAccount::from))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<UserAccount, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        // Usuário e perfil nascem juntos ou não nascem
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, first_name, last_name, password_hash,
                      is_staff, created_at, updated_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await?; // users_username_key / users_email_key viram erro de campo

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO user_profiles (user_id, phone)
            VALUES ($1, $2)
            RETURNING user_id, is_master, phone, avatar_url, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&new_user.phone)
        .fetch_one(&mut *tx)
        .await?; // Se falhar aqui, o usuário acima é desfeito no drop do tx

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        Ok(UserAccount { user, profile })
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<UserAccount>, AppError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE u.id = $1");
        let row = sqlx::query_as::<_, UserAccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserAccount::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, AppError> {
        self.fetch_account("u.username = $1", username).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError> {
        self.fetch_account("u.email = $1", email).await
    }

    async fn update_user(&self, account: &UserAccount) -> Result<UserAccount, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, email = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account.user.id)
        .bind(&account.user.first_name)
        .bind(&account.user.last_name)
        .bind(&account.user.email)
        .execute(&mut *tx)
        .await?;

        // is_master não é editável por aqui
        sqlx::query(
            r#"
            UPDATE user_profiles
            SET phone = $2, avatar_url = $3, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(account.user.id)
        .bind(&account.profile.phone)
        .bind(&account.profile.avatar_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.find_user_by_id(account.user.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn set_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn set_master(&self, user_id: i64, is_master: bool) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE user_profiles SET is_master = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(is_master)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
