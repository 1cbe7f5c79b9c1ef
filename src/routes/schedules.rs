use super::{error_response, AppState};
use crate::models::{FormattedSchedule, OptimizeRequest, OptimizeResponse};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::time::Instant;
use validator::Validate;

/// Configure schedule optimization routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/schedules/optimize", web::post().to(optimize_schedules));
}

/// Rank conflict-free schedules for the requested courses
///
/// POST /api/v1/schedules/optimize
///
/// Request body:
/// ```json
/// {
///   "courseIds": ["MATH 3A", "CMPSC 16"],
///   "preferences": {"spreadPreference": "centered", "minimizeGaps": true},
///   "maxResults": 10
/// }
/// ```
async fn optimize_schedules(state: web::Data<AppState>, req: web::Json<OptimizeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for optimize request: field_errors={:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let request = req.into_inner();
    let max_results = request.result_count(state.limits.default_results, state.limits.max_results);

    if request.course_ids.is_empty() {
        return HttpResponse::Ok().json(OptimizeResponse {
            success: true,
            schedules: Vec::new(),
            candidates_visited: 0,
            truncated: false,
        });
    }

    let started = Instant::now();
    let courses = state.courses.load_courses(&request.course_ids).await;
    tracing::debug!(
        "Loaded {} of {} requested courses",
        courses.len(),
        request.course_ids.len()
    );

    let optimizer = state.optimizer.clone();
    let course_ids = request.course_ids;
    let preferences = request.preferences;

    // Enumeration is CPU-bound; keep it off the async workers
    let result = web::block(move || {
        let result = optimizer.optimize(&courses, &course_ids, &preferences, max_results);
        OptimizeResponse {
            success: true,
            schedules: result.schedules.iter().map(FormattedSchedule::from).collect(),
            candidates_visited: result.candidates_visited,
            truncated: result.truncated,
        }
    })
    .await;

    match result {
        Ok(response) => {
            tracing::info!(
                "Optimized {} schedules ({} candidates, truncated: {}) in {:?}",
                response.schedules.len(),
                response.candidates_visited,
                response.truncated,
                started.elapsed()
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            tracing::error!("Schedule optimization failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Optimization failed", e.to_string())
        }
    }
}
