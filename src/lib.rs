//! Course Planner - schedule-combination engine and course catalog service
//!
//! This library enumerates every non-conflicting lecture/section assignment for a
//! set of courses, scores each full schedule against a student's preferences and
//! keeps the best few. A thin service layer fetches and caches catalog records and
//! exposes the engine over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{time::TimeSlot, CourseLookup, Optimizer, OptimizeResult};
pub use crate::models::{Course, PreferenceProfile, ScoredSchedule, ScoringWeights, OptimizeRequest, OptimizeResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let a = TimeSlot::new("MWF", "10:00", "10:50", None);
        let b = TimeSlot::new("F", "10:50", "11:40", None);
        assert!(!a.overlaps(&b));
        assert_eq!(Optimizer::default().weights(), &ScoringWeights::default());
    }
}
