//! Raw course records as served by the catalog service.
//!
//! The catalog is loosely typed: keys go missing, values arrive as `null`, numbers
//! sometimes arrive as strings. Every field here deserializes leniently so that a
//! malformed record degrades to empty strings, zeros and empty lists instead of
//! failing. This is the only place that policy is applied.

use crate::core::time::TimeSlot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One catalog record, keyed upstream by a single enrollment code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    #[serde(default, deserialize_with = "lenient_string")]
    pub course_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject_area: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub units_fixed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub units_variable_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub general_education: Vec<RawGeneralEducation>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub class_sections: Vec<RawSection>,
}

impl RawClass {
    /// Fixed units, falling back to the upper bound of a variable-unit course
    pub fn units(&self) -> f64 {
        self.units_fixed
            .or(self.units_variable_high)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGeneralEducation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ge_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSection {
    #[serde(default, deserialize_with = "lenient_string")]
    pub enroll_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub section: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub type_instruction: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub instructors: Vec<RawInstructor>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub enrolled_total: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max_enroll: u32,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub time_locations: Vec<RawTimeLocation>,
}

impl RawSection {
    /// Whether the catalog explicitly tags this section as a lecture
    pub fn is_lecture_tag(&self) -> bool {
        self.type_instruction
            .trim()
            .to_ascii_uppercase()
            .starts_with("LEC")
    }

    /// First listed instructor, or an empty string
    pub fn primary_instructor(&self) -> String {
        self.instructors
            .first()
            .map(|i| i.instructor.clone())
            .unwrap_or_default()
    }

    pub fn time_slots(&self) -> Vec<TimeSlot> {
        self.time_locations.iter().map(RawTimeLocation::to_slot).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstructor {
    #[serde(default, deserialize_with = "lenient_string")]
    pub instructor: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeLocation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub days: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub begin_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub building: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub room: String,
}

impl RawTimeLocation {
    pub fn location(&self) -> Option<String> {
        let building = self.building.trim();
        let room = self.room.trim();
        match (building.is_empty(), room.is_empty()) {
            (true, _) => None,
            (false, true) => Some(building.to_string()),
            (false, false) => Some(format!("{} {}", building, room)),
        }
    }

    pub fn to_slot(&self) -> TimeSlot {
        TimeSlot::new(&self.days, &self.begin_time, &self.end_time, self.location())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(value.min(u32::MAX as u64) as u32)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite()))
}

/// Deserialize each element independently, dropping the ones that do not fit
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
