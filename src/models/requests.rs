use crate::core::time::TimeSlot;
use crate::models::domain::PreferenceProfile;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to rank schedules for a set of courses
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptimizeRequest {
    #[serde(default)]
    #[serde(alias = "course_ids", rename = "courseIds")]
    pub course_ids: Vec<String>,
    #[serde(default)]
    pub preferences: PreferenceProfile,
    /// Absent means the configured default
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    #[serde(alias = "max_results", rename = "maxResults")]
    pub max_results: Option<usize>,
}

impl OptimizeRequest {
    /// Requested result count, falling back to `default` and capped at `cap`
    pub fn result_count(&self, default: usize, cap: usize) -> usize {
        self.max_results.unwrap_or(default).min(cap)
    }
}

/// Query string of `GET /courses/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(max = 200))]
    #[serde(default)]
    pub q: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub dept: String,
}

/// Body of `POST /courses/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(max = 200))]
    #[serde(default)]
    pub q: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub dept: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    #[serde(alias = "selected_courses", rename = "selectedCourses")]
    pub selected_courses: Vec<SelectedCourse>,
}

impl SearchRequest {
    /// Every meeting of every already chosen lecture and section
    pub fn busy_slots(&self) -> Vec<TimeSlot> {
        self.selected_courses
            .iter()
            .flat_map(SelectedCourse::time_slots)
            .collect()
    }
}

impl From<SearchQuery> for SearchRequest {
    fn from(query: SearchQuery) -> Self {
        Self {
            q: query.q,
            dept: query.dept,
            selected_courses: Vec::new(),
        }
    }
}

/// A lecture/section pick the student has already made
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectedCourse {
    #[serde(default)]
    #[serde(alias = "course_id", rename = "courseId")]
    pub course_id: Option<String>,
    #[serde(default)]
    pub lecture: Option<SelectedOffering>,
    #[serde(default)]
    pub section: Option<SelectedOffering>,
}

impl SelectedCourse {
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        self.lecture
            .iter()
            .chain(self.section.iter())
            .flat_map(|offering| offering.times.iter())
            .map(SelectedTime::to_slot)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectedOffering {
    #[serde(default)]
    #[serde(alias = "enroll_code", rename = "enrollCode")]
    pub enroll_code: Option<String>,
    #[serde(default)]
    pub times: Vec<SelectedTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectedTime {
    #[serde(default)]
    pub days: String,
    #[serde(default)]
    #[serde(alias = "start_time", rename = "startTime")]
    pub start_time: String,
    #[serde(default)]
    #[serde(alias = "end_time", rename = "endTime")]
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl SelectedTime {
    pub fn to_slot(&self) -> TimeSlot {
        TimeSlot::new(&self.days, &self.start_time, &self.end_time, self.location.clone())
    }
}

/// Request for one lecture and optionally one of its sections
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SectionDetailsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "lecture_code", rename = "lectureCode")]
    pub lecture_code: String,
    #[serde(default)]
    #[serde(alias = "section_code", rename = "sectionCode")]
    pub section_code: Option<String>,
}

impl SectionDetailsRequest {
    /// Section code, treating a blank value as absent
    pub fn section_code(&self) -> Option<&str> {
        self.section_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}
