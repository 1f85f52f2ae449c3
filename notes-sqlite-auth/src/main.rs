mod app;
mod auth;
mod db;
mod notes;
mod shared;
mod users;

use db::init_db;

pub use app::{
    config, create_app, ctx,
    errors::{self, Error, Result},
    state,
};
pub use shared::views;

use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config::config();

    shared::tracing::setup_tracing(config.log_json);

    let conn = init_db().await?;

    let app = create_app(conn).await?;

    let app = shared::tracing::add_tracing_layer(app);

    let port = config.port;
    let listener = TcpListener::bind(format!("127.0.0.1:{port}"))
        .await
        .map_err(|e| Error::Unexpected(format!("failed to bind port {port}: {e}")))?;

    let addr = listener.local_addr().map_err(|e| Error::Unexpected(e.to_string()))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))?;

    Ok(())
}
