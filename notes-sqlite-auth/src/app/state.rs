use axum_macros::FromRef;
use minijinja::Environment;
use std::sync::Arc;

use crate::db::DB;

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub templates: Arc<Environment<'static>>,
}
