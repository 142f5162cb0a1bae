// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{answer_keys, attempts, exams, health, questions, results, students, teachers},
    state::AppState,
    utils::{
        jwt::{auth_middleware, student_middleware, teacher_middleware},
        upload::UPLOADS_URL_PREFIX,
    },
};

/// Assembles the main application router.
///
/// * Public: teacher register/login, exam start, health.
/// * Staff (teacher or admin token): exams, questions, answer keys, roster, results.
/// * Student (exam session token): submission.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    let teacher_routes = Router::new()
        .route("/register", post(teachers::register))
        .route("/login", post(teachers::login))
        .merge(
            Router::new()
                .route("/", get(teachers::list_teachers))
                .layer(middleware::from_fn(teacher_middleware))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let exam_routes = Router::new()
        .route("/", get(exams::list_exams).post(exams::create_exam))
        .route("/{id}", get(exams::get_exam).delete(exams::delete_exam))
        .route(
            "/{id}/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/{id}/answer-keys",
            get(answer_keys::list_answer_keys)
                .put(answer_keys::replace_answer_keys)
                .delete(answer_keys::delete_answer_keys),
        )
        .route("/{id}/results", get(results::exam_results))
        .route("/{id}/results/export", get(results::export_results))
        .layer(upload_limit.clone())
        // Auth first, then role check
        .layer(middleware::from_fn(teacher_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let student_roster_routes = Router::new()
        .route("/", get(students::list_students))
        .route("/import", post(students::import_students))
        .layer(upload_limit)
        .layer(middleware::from_fn(teacher_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let result_routes = Router::new()
        .route("/", get(results::list_all_results))
        .layer(middleware::from_fn(teacher_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let attempt_routes = Router::new()
        .route("/start", post(attempts::start_exam))
        .merge(
            Router::new()
                .route("/submit", post(attempts::submit_exam))
                .layer(middleware::from_fn(student_middleware))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/teachers", teacher_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/students", student_roster_routes)
        .nest("/api/results", result_routes)
        .nest("/api/student", attempt_routes)
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
