use crate::core::time::TimeSlot;
use crate::models::domain::{Combination, Course, ScoredSchedule, SectionOffering};
use serde::{Deserialize, Serialize};

/// One lecture or section as shown to the student
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedOffering {
    pub enroll_code: String,
    pub section: String,
    pub instructor: String,
    pub times: Vec<TimeSlot>,
    pub enrolled: u32,
    pub max_enroll: u32,
    pub open_seats: u32,
    pub is_full: bool,
    pub times_unknown: bool,
}

impl From<&SectionOffering> for FormattedOffering {
    fn from(offering: &SectionOffering) -> Self {
        Self {
            enroll_code: offering.enroll_code.clone(),
            section: offering.section_label.clone(),
            instructor: offering.instructor.clone(),
            times: offering.time_slots.clone(),
            enrolled: offering.enrolled_count,
            max_enroll: offering.capacity,
            open_seats: offering.open_seats(),
            is_full: offering.is_full(),
            times_unknown: offering.times_unknown(),
        }
    }
}

/// The pick for one course inside a ranked schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedCombination {
    pub course_id: String,
    pub title: String,
    pub units: f64,
    pub lecture: FormattedOffering,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<FormattedOffering>,
}

impl From<&Combination<'_>> for FormattedCombination {
    fn from(combination: &Combination<'_>) -> Self {
        Self {
            course_id: combination.course.course_id.clone(),
            title: combination.course.title.clone(),
            units: combination.course.units,
            lecture: combination.lecture.into(),
            section: combination.section.map(FormattedOffering::from),
        }
    }
}

/// A ranked schedule, positional with the requested course ids
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedSchedule {
    pub score: f64,
    pub courses: Vec<FormattedCombination>,
}

impl From<&ScoredSchedule<'_>> for FormattedSchedule {
    fn from(scored: &ScoredSchedule<'_>) -> Self {
        Self {
            score: scored.score,
            courses: scored.schedule.iter().map(FormattedCombination::from).collect(),
        }
    }
}

/// Response for the optimize endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    pub schedules: Vec<FormattedSchedule>,
    pub candidates_visited: usize,
    pub truncated: bool,
}

/// Index pair of a lecture/section choice that fits the student's current picks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationRef {
    pub lecture_index: usize,
    pub section_index: Option<usize>,
    pub lecture_code: String,
    pub section_code: Option<String>,
}

/// Search result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course_id: String,
    pub title: String,
    pub subject_area: String,
    pub units: f64,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_free_combinations: Option<Vec<CombinationRef>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub success: bool,
    pub course: Course,
}

/// One lecture and optionally one section of a course
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetails {
    pub course_id: String,
    pub title: String,
    pub subject_area: String,
    pub units: f64,
    pub lecture: FormattedOffering,
    pub section: Option<FormattedOffering>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionDetailsResponse {
    pub success: bool,
    pub course: SectionDetails,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
