use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use minijinja::context;
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::{
    auth::Result,
    db::{self, DB},
    shared::forms::{empty_string_as_none, FormErrors, NON_FIELD_ERRORS},
    state::AppState,
    users::{
        auth::{create_user, CreateUserParameters},
        password::hash_password,
        rules::{is_valid_username, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH},
    },
    views::{found, Views},
};

use super::backend::{AuthSession, Credentials};

pub const INVALID_LOGIN: &str = "Please enter a correct username and password.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
const REQUIRED: &str = "This field is required.";

#[derive(Deserialize)]
pub struct Next {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

impl SignupForm {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > MAX_USERNAME_LENGTH {
            errors.add(
                "username",
                format!("Ensure this value has at most {MAX_USERNAME_LENGTH} characters."),
            );
        } else if !is_valid_username(username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        }
        if !self.password1.is_empty() && !self.password2.is_empty() {
            if self.password1 != self.password2 {
                errors.add("password2", "The two password fields didn't match.");
            } else {
                if self.password1.chars().count() < MIN_PASSWORD_LENGTH {
                    errors.add(
                        "password2",
                        format!("This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."),
                    );
                }
                if self.password1.chars().all(|c| c.is_ascii_digit()) {
                    errors.add("password2", "This password is entirely numeric.");
                }
            }
        }

        errors.into_result()
    }
}

/// Only local paths are followed after login.
fn redirect_target(next: Option<&str>) -> &str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => "/",
    }
}

pub fn router(state: AppState) -> Router<()> {
    Router::new()
        .route("/auth/login", get(login_view).post(login))
        .route("/auth/logout", get(logout).post(logout))
        .route("/auth/signup", get(signup_view).post(signup))
        .with_state(state)
}

pub async fn login_view(view: Views, Query(Next { next }): Query<Next>) -> impl IntoResponse {
    let form = LoginForm {
        next,
        ..Default::default()
    };
    view.response("auth/login.html", context! { form => form })
}

pub async fn login(mut auth_session: AuthSession, view: Views, Form(form): Form<LoginForm>) -> Result<Response> {
    let creds = Credentials {
        username: form.username.trim().to_string(),
        password: form.password.clone(),
    };

    let Some(user) = auth_session.authenticate(creds).await? else {
        let errors = FormErrors::new().with(NON_FIELD_ERRORS, INVALID_LOGIN);
        return Ok(view.response("auth/login.html", context! { form => form, errors => errors }));
    };

    auth_session.login(&user).await?;

    tracing::info!("{} logged in", user.username);

    Ok(found(redirect_target(form.next.as_deref())))
}

pub async fn logout(mut auth_session: AuthSession, view: Views) -> Result<Response> {
    if let Some(user) = auth_session.logout().await? {
        tracing::info!("{} logged out", user.username);
    }

    let view = Views { user: None, ..view };
    Ok(view.response("auth/logout.html", context! {}))
}

pub async fn signup_view(view: Views) -> impl IntoResponse {
    view.response("auth/signup.html", context! { form => SignupForm::default() })
}

pub async fn signup(view: Views, State(db): State<DB>, Form(form): Form<SignupForm>) -> Result<Response> {
    if let Err(errors) = form.validate() {
        return Ok(view.response("auth/signup.html", context! { form => form, errors => errors }));
    }

    let password = form.password1.clone();
    let password_hash = task::spawn_blocking(move || hash_password(&password)).await??;

    let created = create_user(
        db,
        CreateUserParameters {
            username: form.username.trim().to_string(),
            password_hash,
        },
    )
    .await;

    match created {
        Ok(_) => Ok(found(super::middleware::LOGIN_URL)),
        Err(db::Error::UniqueViolation(_)) => {
            let errors = FormErrors::new().with("username", USERNAME_TAKEN);
            Ok(view.response("auth/signup.html", context! { form => form, errors => errors }))
        }
        Err(err) => Err(err.into()),
    }
}
