// Model exports
pub mod catalog;
pub mod domain;
pub mod requests;
pub mod responses;

pub use catalog::RawClass;
pub use domain::{
    Combination, Course, LectureGroup, PreferenceProfile, Schedule, ScoredSchedule, ScoringWeights, SectionKind,
    SectionOffering, SpreadPreference, TimeOfDay,
};
pub use requests::{OptimizeRequest, SearchQuery, SearchRequest, SectionDetailsRequest, SelectedCourse};
pub use responses::{
    CombinationRef, CourseResponse, CourseSummary, ErrorResponse, FormattedCombination, FormattedOffering,
    FormattedSchedule, HealthResponse, OptimizeResponse, SearchResponse, SectionDetails, SectionDetailsResponse,
};
