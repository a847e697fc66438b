use axum::Router;

pub mod admin;
pub mod system;

pub fn router() -> Router {
    Router::new().nest("/admin", admin::router())
}
