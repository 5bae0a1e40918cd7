//! Web front end for `pdf-compose`
//!
//! Four upload forms, each posting to a handler that stores the generated
//! PDF for a single download.

pub mod config;
pub mod error;
pub mod handlers;
pub mod multipart;
pub mod operation;
pub mod state;
pub mod views;

pub use config::Config;
pub use operation::Operation;
pub use state::AppState;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn app(state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health));

    for op in Operation::ALL {
        router = router.route(&op.form_path(), get(move || async move { handlers::form(op) }));
    }

    router
        .route(Operation::ImageToPdf.post_path(), post(handlers::image_to_pdf))
        .route(Operation::AddPages.post_path(), post(handlers::add_pages))
        .route(Operation::Merge.post_path(), post(handlers::merge_pdf))
        .route(Operation::PageNumbers.post_path(), post(handlers::add_page_numbers))
        .route("/{slug}/download/{token}", get(handlers::download_page))
        .route("/{slug}/download/file/{token}", get(handlers::download_file))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
