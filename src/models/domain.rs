use crate::core::time::{parse_clock, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role a section plays in a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Explicitly tagged lecture
    Lecture,
    /// Discussion or lab tied to one lecture
    Secondary,
    /// Section with no lecture, scheduled as its own lecture
    Standalone,
}

/// One specific offering (lecture or section) identified by its enrollment code
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOffering {
    pub enroll_code: String,
    #[serde(rename = "section")]
    pub section_label: String,
    pub instructor: String,
    #[serde(rename = "times")]
    pub time_slots: Vec<TimeSlot>,
    #[serde(rename = "enrolled")]
    pub enrolled_count: u32,
    #[serde(rename = "maxEnroll")]
    pub capacity: u32,
    pub kind: SectionKind,
}

impl SectionOffering {
    /// No slot of this offering has verifiable times
    pub fn times_unknown(&self) -> bool {
        self.time_slots.iter().all(|slot| slot.times_unknown)
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.enrolled_count >= self.capacity
    }

    pub fn open_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled_count)
    }
}

/// A lecture together with the secondary sections that belong to it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureGroup {
    pub lecture: SectionOffering,
    pub sections: Vec<SectionOffering>,
}

/// Canonical view of a course assembled from every catalog record sharing its id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: String,
    pub title: String,
    pub subject_area: String,
    pub units: f64,
    #[serde(rename = "generalEducation")]
    pub general_education_tags: BTreeSet<String>,
    pub description: String,
    pub lectures: Vec<LectureGroup>,
}

/// One lecture paired with at most one of its secondary sections
#[derive(Debug, Clone, Copy)]
pub struct Combination<'a> {
    pub course: &'a Course,
    pub lecture: &'a SectionOffering,
    pub section: Option<&'a SectionOffering>,
}

impl<'a> Combination<'a> {
    /// Every meeting of the lecture followed by every meeting of the section
    pub fn time_slots(&self) -> impl Iterator<Item = &'a TimeSlot> + 'a {
        let lecture: &'a SectionOffering = self.lecture;
        let section: Option<&'a SectionOffering> = self.section;
        lecture
            .time_slots
            .iter()
            .chain(section.into_iter().flat_map(|s| s.time_slots.iter()))
    }

    pub fn enroll_codes(&self) -> (&'a str, Option<&'a str>) {
        (
            self.lecture.enroll_code.as_str(),
            self.section.map(|s| s.enroll_code.as_str()),
        )
    }
}

/// One combination per requested course, positional with the requested course ids
pub type Schedule<'a> = Vec<Combination<'a>>;

/// A valid schedule with its score
#[derive(Debug, Clone)]
pub struct ScoredSchedule<'a> {
    pub schedule: Schedule<'a>,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadPreference {
    Centered,
    Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

/// Student preferences used to rank schedules
///
/// Every option is independent. An absent option has no effect on the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
    #[serde(default)]
    pub spread_preference: Option<SpreadPreference>,
    #[serde(default)]
    pub preferred_start_time: Option<String>,
    #[serde(default)]
    pub preferred_end_time: Option<String>,
    #[serde(default)]
    pub avoid_early_morning: bool,
    #[serde(default)]
    pub avoid_late_evening: bool,
    #[serde(default)]
    pub prioritize_free_days: bool,
    #[serde(default)]
    pub minimize_gaps: bool,
    #[serde(default)]
    pub max_classes_per_day: Option<u32>,
    #[serde(default)]
    pub preferred_time_of_day: Option<TimeOfDay>,
}

impl PreferenceProfile {
    /// Preferred `(start, end)` window in minutes, only when both bounds parse
    pub fn preferred_window(&self) -> Option<(u16, u16)> {
        let start = parse_clock(self.preferred_start_time.as_deref()?)?;
        let end = parse_clock(self.preferred_end_time.as_deref()?)?;
        Some((start, end))
    }
}

/// Scoring weights
///
/// Defaults reproduce the standard ranking; a deployment can retune them in
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub base: f64,
    pub centering: f64,
    pub spread_penalty: f64,
    pub spread_bonus: f64,
    pub spread_bonus_cap: f64,
    pub preferred_window: f64,
    pub early_penalty: f64,
    pub late_penalty: f64,
    pub free_day: f64,
    pub gap_divisor: f64,
    pub gap_penalty_cap: f64,
    pub no_gap_bonus: f64,
    pub excess_class_penalty: f64,
    pub time_of_day: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 100.0,
            centering: 30.0,
            spread_penalty: 0.01,
            spread_bonus: 0.05,
            spread_bonus_cap: 30.0,
            preferred_window: 20.0,
            early_penalty: 10.0,
            late_penalty: 10.0,
            free_day: 15.0,
            gap_divisor: 10.0,
            gap_penalty_cap: 50.0,
            no_gap_bonus: 20.0,
            excess_class_penalty: 25.0,
            time_of_day: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preferences_default_to_no_effect() {
        let prefs: PreferenceProfile = serde_json::from_value(json!({})).unwrap();
        assert_eq!(prefs, PreferenceProfile::default());
        assert_eq!(prefs.preferred_window(), None);
    }

    #[test]
    fn test_preferences_parse() {
        let prefs: PreferenceProfile = serde_json::from_value(json!({
            "spreadPreference": "spread",
            "preferredStartTime": "10:30",
            "preferredEndTime": "14:30",
            "avoidEarlyMorning": true,
            "maxClassesPerDay": 3,
            "preferredTimeOfDay": "afternoon"
        }))
        .unwrap();

        assert_eq!(prefs.spread_preference, Some(SpreadPreference::Spread));
        assert_eq!(prefs.preferred_window(), Some((630, 870)));
        assert!(prefs.avoid_early_morning);
        assert!(!prefs.minimize_gaps);
        assert_eq!(prefs.max_classes_per_day, Some(3));
        assert_eq!(prefs.preferred_time_of_day, Some(TimeOfDay::Afternoon));
    }

    #[test]
    fn test_preferences_reject_wrong_types() {
        let bad_flag = serde_json::from_value::<PreferenceProfile>(json!({"minimizeGaps": "yes"}));
        assert!(bad_flag.is_err());

        let bad_enum = serde_json::from_value::<PreferenceProfile>(json!({"preferredTimeOfDay": "noon"}));
        assert!(bad_enum.is_err());
    }

    #[test]
    fn test_window_needs_both_bounds() {
        let prefs = PreferenceProfile {
            preferred_start_time: Some("09:00".to_string()),
            ..Default::default()
        };
        assert_eq!(prefs.preferred_window(), None);
    }

    #[test]
    fn test_seat_helpers() {
        let offering = SectionOffering {
            enroll_code: "1".to_string(),
            section_label: "0101".to_string(),
            instructor: String::new(),
            time_slots: vec![],
            enrolled_count: 30,
            capacity: 30,
            kind: SectionKind::Secondary,
        };
        assert!(offering.is_full());
        assert_eq!(offering.open_seats(), 0);
        assert!(offering.times_unknown());
    }
}
