use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
};
use minijinja::{context, Environment, Error};

use crate::ctx::{Ctx, User};

/// Template renderer bound to the current request, so every page sees `user`.
#[derive(Debug, Clone)]
pub struct Views {
    pub env: Arc<Environment<'static>>,
    pub user: Option<User>,
}

impl Views {
    pub fn new(env: Arc<Environment<'static>>, user: Option<User>) -> Self {
        Self { env, user }
    }

    pub fn response<D: serde::Serialize>(&self, key: &str, data: D) -> Response {
        match self.render(key, data) {
            Ok(x) => Html(x).into_response(),
            Err(err) => {
                tracing::error!("failed to render {key}: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }

    pub fn render<D: serde::Serialize>(&self, key: &str, data: D) -> Result<String, Error> {
        let template = self.env.get_template(key)?;
        let data = minijinja::Value::from_serialize(&data);

        template.render(context! { user => self.user, ..data })
    }
}

impl<S> FromRequestParts<S> for Views
where
    Arc<Environment<'static>>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = Ctx::from_request_parts(parts, state).await?;

        let env = <Arc<Environment<'static>> as FromRef<S>>::from_ref(state);

        Ok(Self::new(env, ctx.user))
    }
}

/// `302 Found` to `uri`, the redirect browsers follow after a form post.
pub fn found(uri: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, uri.to_string())]).into_response()
}

pub fn create_environment() -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);
    env.add_template("base.html", include_str!("../templates/base.html"))?;
    env.add_template("home.html", include_str!("../templates/home.html"))?;

    crate::auth::add_templates(&mut env)?;
    crate::notes::add_templates(&mut env)?;

    Ok(env)
}
