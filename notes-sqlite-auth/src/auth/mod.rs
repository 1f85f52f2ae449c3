mod backend;
mod errors;
mod routes;

use axum::Router;
use axum_login::AuthManagerLayerBuilder;
use minijinja::Environment;
use tower_sessions::SessionStore;

pub use backend::{AuthBackend, AuthSession};
pub use errors::{Error, Result};
pub use routes::router;

use crate::db::DB;

pub fn add_auth_layer(
    app: Router,
    session_layer: tower_sessions::SessionManagerLayer<impl SessionStore + Clone>,
    db: DB,
) -> Router {
    let auth_backend = AuthBackend::new(db);
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    app.layer(auth_layer)
}

pub fn add_templates(env: &mut Environment<'static>) -> std::result::Result<(), minijinja::Error> {
    env.add_template("auth/login.html", include_str!("../templates/auth/login.html"))?;
    env.add_template("auth/logout.html", include_str!("../templates/auth/logout.html"))?;
    env.add_template("auth/signup.html", include_str!("../templates/auth/signup.html"))?;
    Ok(())
}

pub mod middleware {
    use axum::{
        extract::Request,
        http::Uri,
        middleware::Next,
        response::Response,
    };

    use super::*;
    use crate::views::found;

    pub const LOGIN_URL: &str = "/auth/login";

    /// Sends anonymous visitors to the login page, remembering where they were going.
    pub async fn protected_view(auth_session: AuthSession, url: Uri, request: Request, next: Next) -> Response {
        if auth_session.user.is_some() {
            return next.run(request).await;
        }

        let path = url.path();
        let redirect_url = format!("{LOGIN_URL}?next={path}");

        found(&redirect_url)
    }
}
