use std::sync::Arc;

use axum::{Extension, Router};
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};

use crate::{auth, config::config, db::DB, notes, views::create_environment};

use super::{errors, state::AppState};

pub async fn create_app(db: DB) -> errors::Result<Router> {
    let config = config();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.session_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(config.session_inactivity_days)));

    let state = AppState {
        conn: db.clone(),
        templates: Arc::new(create_environment()?),
    };

    let app = Router::new()
        .merge(auth::router(state.clone()))
        .merge(notes::router(state.clone()))
        .layer(Extension(db));

    let app = auth::add_auth_layer(app, session_layer, state.conn.clone());

    Ok(app)
}
