use crate::{
    routes::{
        health::get_health,
        shell::{get_shell, post_shell},
        students::{
            delete_student, get_student, get_students, post_student, put_student,
            search_students,
        },
    },
    state::RosterState,
};
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod health;
pub mod shell;
pub mod students;

pub fn router(state: RosterState) -> Router {
    let body_limit = state.config().server_config().body_limit();

    Router::new()
        .route("/api/students", get(get_students).post(post_student))
        .route(
            "/api/students/{id}",
            get(get_student).put(put_student).delete(delete_student),
        )
        .route("/api/students/search/{query}", get(search_students))
        .route("/api/health", get(get_health))
        .route("/", get(get_shell).post(post_shell))
        .fallback(get_shell)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
