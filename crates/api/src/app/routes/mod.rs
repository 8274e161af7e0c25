use axum::Router;

pub mod categories;
pub mod inventory;
pub mod products;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest("/productos", products::router())
        .nest("/categorias", categories::router())
        .nest("/reportes", inventory::router())
}
