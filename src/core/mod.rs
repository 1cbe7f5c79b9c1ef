// Core algorithm exports
pub mod combinations;
pub mod filters;
pub mod normalizer;
pub mod optimizer;
pub mod scoring;
pub mod time;

pub use combinations::{find_valid_combinations, generate_all_schedules, is_conflict_free, schedules, CourseLookup, ScheduleIter};
pub use filters::{conflict_free_combinations, filter_courses_by_schedule};
pub use normalizer::{normalize_course, normalize_course_id, normalize_courses};
pub use optimizer::{OptimizeResult, Optimizer};
pub use scoring::score_schedule;
pub use time::{overlaps, DaySet, TimeSlot, Weekday};
