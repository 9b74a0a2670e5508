//! Course service routes

use std::any::Any;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{Course, CourseInput, CourseQuery, LoginRequest, LoginResponse},
    state::AppState,
    validation::Validated,
};

/// Create the router for the course service
pub fn create_router(state: AppState) -> Router {
    let course_routes = Router::new()
        .route("/courses", post(create_course).get(list_courses))
        .route(
            "/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/login", post(login))
        .merge(course_routes)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Plain-text banner
pub async fn index() -> &'static str {
    "Course API is running."
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = match common::database::health_check(&state.db_pool).await {
        Ok(ok) => ok,
        Err(e) => {
            error!("Database health check failed: {}", e);
            false
        }
    };

    let (status, database) = if database_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(json!({
            "status": if database_ok { "ok" } else { "degraded" },
            "service": "course-service",
            "database": database
        })),
    )
}

/// Exchange the configured username/password for a session token
pub async fn login(
    State(state): State<AppState>,
    Validated(payload): Validated<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    info!("Login attempt for user: {}", payload.username);

    state
        .credentials
        .verify(&payload.username, &payload.password)
        .inspect_err(|_| warn!("Invalid credentials for user: {}", payload.username))?;

    let token = state.jwt_service.issue(&payload.username).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(LoginResponse { token }))
}

/// Create a new course
pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Validated(input): Validated<CourseInput>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    let course = state.course_repository.create(&input).await.map_err(|e| {
        error!("Failed to create course: {}", e);
        ApiError::from(e)
    })?;

    info!("Course {} created by {}", course.id, user.username);
    Ok((StatusCode::CREATED, Json(course)))
}

/// List courses, optionally filtered by title
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> ApiResult<Json<Vec<Course>>> {
    let courses = state
        .course_repository
        .list(query.title.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to list courses: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(courses))
}

/// Get a course by ID
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Course>> {
    let id = parse_course_id(&id)?;

    let course = state
        .course_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get course {}: {}", id, e);
            ApiError::from(e)
        })?
        .ok_or_else(ApiError::course_not_found)?;

    Ok(Json(course))
}

/// Replace every field of a course
pub async fn update_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Validated(input): Validated<CourseInput>,
) -> ApiResult<Json<Course>> {
    let id = parse_course_id(&id)?;

    let course = state
        .course_repository
        .update(id, &input)
        .await
        .map_err(|e| {
            error!("Failed to update course {}: {}", id, e);
            ApiError::from(e)
        })?
        .ok_or_else(ApiError::course_not_found)?;

    info!("Course {} updated by {}", course.id, user.username);
    Ok(Json(course))
}

/// Delete a course by ID
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_course_id(&id)?;

    let deleted = state.course_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete course {}: {}", id, e);
        ApiError::from(e)
    })?;

    if deleted {
        info!("Course {} deleted by {}", id, user.username);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::course_not_found())
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found.".to_string())
}

/// Non-integer ids cannot name a stored course
///
/// The whole segment must be an integer. Trailing characters or a
/// fractional part (`1abc`, `1.9`) are rejected, not truncated to `1`.
fn parse_course_id(raw: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| ApiError::course_not_found())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!("Handler panicked: {}", detail);
    ApiError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_id() {
        assert_eq!(parse_course_id("12").unwrap(), 12);
        assert!(matches!(
            parse_course_id("abc"),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            parse_course_id("12abc"),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            parse_course_id("1.9"),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(parse_course_id("1abc"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_panic_maps_to_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
