use async_trait::async_trait;
use axum_login::AuthUser;
use serde::Deserialize;
use tokio::task;

use crate::{
    db::{self, DB},
    users::{
        auth::{find_one_by_id, find_one_by_username, GetUserByIdParameters, GetUserByUsernameParameters, User},
        password::verify_password,
        UserId,
    },
};

use super::Error;

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl AuthUser for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }

    // Changing the password invalidates existing sessions.
    fn session_auth_hash(&self) -> &[u8] {
        self.password.as_bytes()
    }
}

#[derive(Clone)]
pub struct AuthBackend {
    db: DB,
}

impl AuthBackend {
    pub fn new(db: DB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl axum_login::AuthnBackend for AuthBackend {
    type User = User;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(&self, creds: Self::Credentials) -> Result<Option<Self::User>, Self::Error> {
        let user = match find_one_by_username(
            self.db.clone(),
            GetUserByUsernameParameters {
                username: creds.username.clone(),
            },
        )
        .await
        {
            Ok(user) => user,
            Err(db::Error::NotFound(_)) => {
                tracing::debug!("login attempt for unknown user {}", creds.username);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let hash = user.password.clone();
        let verified = task::spawn_blocking(move || verify_password(&creds.password, &hash)).await?;

        Ok(verified.then_some(user))
    }

    async fn get_user(&self, user_id: &axum_login::UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        match find_one_by_id(
            self.db.clone(),
            GetUserByIdParameters {
                user_id: user_id.to_owned(),
            },
        )
        .await
        {
            Ok(user) => Ok(Some(user)),
            Err(db::Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl<AuthBackend> From<axum_login::Error<AuthBackend>> for Error
where
    AuthBackend: axum_login::AuthnBackend<Error = Error>,
{
    fn from(error: axum_login::Error<AuthBackend>) -> Self {
        match error {
            axum_login::Error::Session(err) => Error::Session(err),
            axum_login::Error::Backend(err) => err,
        }
    }
}

pub type AuthSession = axum_login::AuthSession<AuthBackend>;
