use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{corrupt_row, map_delete_error, map_write_error};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{AuthType, Email, Phone, User};

const USER_COLUMNS: &str = r#"
    id, email, phone, password_hash, first_name, last_name, about, photo,
    auth_type, social_auth_uid, is_agree_terms, is_active, is_staff,
    date_joined, last_login
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    phone: Option<String>,
    password_hash: Option<String>,
    first_name: String,
    last_name: String,
    about: String,
    photo: Option<String>,
    auth_type: AuthType,
    social_auth_uid: Option<String>,
    is_agree_terms: bool,
    is_active: bool,
    is_staff: bool,
    date_joined: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(r.email).map_err(|e| corrupt_row("email", e))?;
        let phone = r
            .phone
            .map(Phone::new)
            .transpose()
            .map_err(|e| corrupt_row("phone", e))?;
        Ok(User {
            id: r.id,
            email,
            phone,
            password_hash: r.password_hash,
            first_name: r.first_name,
            last_name: r.last_name,
            about: r.about,
            photo: r.photo,
            auth_type: r.auth_type,
            social_auth_uid: r.social_auth_uid,
            is_agree_terms: r.is_agree_terms,
            is_active: r.is_active,
            is_staff: r.is_staff,
            date_joined: r.date_joined,
            last_login: r.last_login,
        })
    }
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, phone, password_hash, first_name, last_name, about, photo,
                auth_type, social_auth_uid, is_agree_terms, is_active, is_staff,
                date_joined, last_login
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(user.phone.as_ref().map(Phone::as_str))
        .bind(user.password_hash.as_deref())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.about)
        .bind(user.photo.as_deref())
        .bind(user.auth_type)
        .bind(user.social_auth_uid.as_deref())
        .bind(user.is_agree_terms)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.date_joined)
        .bind(user.last_login)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, phone = $3, password_hash = $4, first_name = $5,
                last_name = $6, about = $7, photo = $8, is_agree_terms = $9,
                is_active = $10, is_staff = $11, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(user.phone.as_ref().map(Phone::as_str))
        .bind(user.password_hash.as_deref())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.about)
        .bind(user.photo.as_deref())
        .bind(user.is_agree_terms)
        .bind(user.is_active)
        .bind(user.is_staff)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("User".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("User".to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        self.find_one("email", email.as_str()).await
    }

    async fn find_by_phone(&self, phone: &Phone) -> RepositoryResult<Option<User>> {
        self.find_one("phone", phone.as_str()).await
    }

    async fn find_by_social_uid(&self, uid: &str) -> RepositoryResult<Option<User>> {
        self.find_one("social_auth_uid", uid).await
    }

    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
