use super::{error_response, AppState};
use crate::models::{
    CourseResponse, HealthResponse, SearchQuery, SearchRequest, SearchResponse, SectionDetailsRequest,
    SectionDetailsResponse,
};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

/// Configure all catalog browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/departments", web::get().to(departments))
        .route("/courses/search", web::get().to(search_courses))
        .route("/courses/search", web::post().to(search_courses_filtered))
        .route("/courses/{course_id}", web::get().to(course_detail))
        .route("/sections/details", web::post().to(section_details));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    // Without catalog access only cached courses can be served
    let status = if state.courses.catalog_enabled() { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/v1/departments
async fn departments(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.courses.departments())
}

/// GET /api/v1/courses/search?q=&dept=
async fn search_courses(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    run_search(&state, SearchRequest::from(query.into_inner())).await
}

/// Search courses, optionally keeping only those that fit the selected courses
///
/// POST /api/v1/courses/search
///
/// Request body:
/// ```json
/// {
///   "q": "calc",
///   "dept": "MATH",
///   "selectedCourses": [
///     {"lecture": {"times": [{"days": "MWF", "startTime": "10:00", "endTime": "10:50"}]}}
///   ]
/// }
/// ```
async fn search_courses_filtered(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    run_search(&state, req.into_inner()).await
}

async fn run_search(state: &AppState, request: SearchRequest) -> HttpResponse {
    let courses = state.courses.search_with_schedule(&request).await;

    tracing::info!(
        "Search q={:?} dept={:?} selected={} -> {} courses",
        request.q,
        request.dept,
        request.selected_courses.len(),
        courses.len()
    );

    HttpResponse::Ok().json(SearchResponse { success: true, courses })
}

/// GET /api/v1/courses/{course_id}
async fn course_detail(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let course_id = path.into_inner();

    match state.courses.course(&course_id).await {
        Some(course) => HttpResponse::Ok().json(CourseResponse { success: true, course }),
        None => error_response(
            StatusCode::NOT_FOUND,
            "Course not found",
            format!("Course not found: {}", course_id),
        ),
    }
}

/// POST /api/v1/sections/details
async fn section_details(state: web::Data<AppState>, req: web::Json<SectionDetailsRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    match state
        .courses
        .section_details(&req.lecture_code, req.section_code())
        .await
    {
        Ok(course) => HttpResponse::Ok().json(SectionDetailsResponse { success: true, course }),
        Err(err) => error_response(StatusCode::NOT_FOUND, "Section not found", err.to_string()),
    }
}
