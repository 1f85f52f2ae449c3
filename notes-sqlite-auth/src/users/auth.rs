use crate::db::{self, DB};
use rusqlite::{named_params, Row};

use super::*;

#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserParameters {
    pub username: String,
    pub password_hash: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByUsernameParameters {
    pub username: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByIdParameters {
    pub user_id: UserId,
}

pub type GetUserResponse = User;
pub type CreateUserResponse = User;

pub async fn create_user(db: DB, args: CreateUserParameters) -> db::Result<CreateUserResponse> {
    let user = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO users (username, password) VALUES (:username, :password)
                    RETURNING id, username, password, created_at, updated_at"#,
                named_params! {
                    ":username": args.username,
                    ":password": args.password_hash
                },
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await?;

    tracing::info!("user {} signed up", user.username);

    Ok(user)
}

pub async fn find_one_by_id(db: DB, args: GetUserByIdParameters) -> db::Result<GetUserResponse> {
    let user_id = args.user_id;
    let user = db
        .call(move |conn| {
            conn.query_row_and_then(
                "SELECT id, username, password, created_at, updated_at FROM users WHERE id = ?",
                [args.user_id],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", user_id)))?;

    Ok(user)
}

pub async fn find_one_by_username(db: DB, args: GetUserByUsernameParameters) -> db::Result<GetUserResponse> {
    let username = args.username.to_owned();
    let user = db
        .call(|conn| {
            conn.query_row(
                "SELECT id, username, password, created_at, updated_at FROM users WHERE username = ?",
                [args.username],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", username)))?;

    Ok(user)
}
