use serde::{Serialize, Serializer};
use std::fmt;

/// Weekdays a class can meet on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Catalog day letter (R is Thursday)
    pub fn letter(self) -> char {
        match self {
            Weekday::Mon => 'M',
            Weekday::Tue => 'T',
            Weekday::Wed => 'W',
            Weekday::Thu => 'R',
            Weekday::Fri => 'F',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'M' => Some(Weekday::Mon),
            'T' => Some(Weekday::Tue),
            'W' => Some(Weekday::Wed),
            'R' => Some(Weekday::Thu),
            'F' => Some(Weekday::Fri),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << self.index()
    }
}

/// Set of weekdays, stored as a bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub fn empty() -> Self {
        Self(0)
    }

    /// Parse a catalog day string such as `"M W F"` or `"TR"`.
    ///
    /// Whitespace and letters that are not Monday-Friday are ignored.
    pub fn parse(days: &str) -> Self {
        days.chars()
            .filter_map(Weekday::from_letter)
            .fold(Self::empty(), |set, day| set.with(day))
    }

    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | day.bit())
    }

    #[inline]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    #[inline]
    pub fn intersects(&self, other: &DaySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(&self, other: &DaySet) -> DaySet {
        DaySet(self.0 | other.0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(move |day| self.contains(*day))
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.iter() {
            write!(f, "{}", day.letter())?;
        }
        Ok(())
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a 24-hour `"HH:MM"` clock time into minutes since midnight.
///
/// Returns `None` for anything malformed; never panics.
pub fn parse_clock(time: &str) -> Option<u16> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours: u16 = hours.trim().parse().ok()?;
    let minutes: u16 = minutes.trim().parse().ok()?;

    if hours >= 24 || minutes >= 60 {
        return None;
    }

    Some(hours * 60 + minutes)
}

/// A single weekly meeting window
///
/// The raw clock strings are kept for output. A slot whose days are empty or whose
/// times do not parse into a `start < end` window is "to be arranged": it is kept
/// and flagged with `times_unknown`, but it never conflicts with anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub days: DaySet,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub times_unknown: bool,
    #[serde(skip)]
    window: Option<(u16, u16)>,
}

impl TimeSlot {
    pub fn new(days: &str, start_time: &str, end_time: &str, location: Option<String>) -> Self {
        let days = DaySet::parse(days);
        let window = match (parse_clock(start_time), parse_clock(end_time)) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        };

        Self {
            days,
            start_time: start_time.trim().to_string(),
            end_time: end_time.trim().to_string(),
            location: location.filter(|l| !l.trim().is_empty()),
            times_unknown: days.is_empty() || window.is_none(),
            window,
        }
    }

    /// `(start, end)` in minutes, when the clock times are valid
    #[inline]
    pub fn window(&self) -> Option<(u16, u16)> {
        self.window
    }

    /// Whether this slot has days and a valid window, so it can conflict and be scored
    #[inline]
    pub fn is_verifiable(&self) -> bool {
        !self.times_unknown
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        overlaps(self, other)
    }
}

/// True iff the two slots share a weekday and their time windows intersect.
///
/// Slots that touch at a boundary (one ends exactly when the other starts) do not
/// conflict. Slots without valid times never conflict.
#[inline]
pub fn overlaps(a: &TimeSlot, b: &TimeSlot) -> bool {
    if !a.days.intersects(&b.days) {
        return false;
    }

    match (a.window, b.window) {
        (Some((start_a, end_a)), Some((start_b, end_b))) => start_a < end_b && start_b < end_a,
        _ => false,
    }
}

/// True if any slot in `a` overlaps any slot in `b`
pub fn slots_conflict(a: &[TimeSlot], b: &[TimeSlot]) -> bool {
    a.iter().any(|slot| b.iter().any(|other| overlaps(slot, other)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(days: &str, start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(days, start, end, None)
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("00:00"), Some(0));
        assert_eq!(parse_clock("09:30"), Some(570));
        assert_eq!(parse_clock("23:59"), Some(1439));
        assert_eq!(parse_clock(" 14:05 "), Some(845));
    }

    #[test]
    fn test_parse_clock_malformed() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("9"), None);
        assert_eq!(parse_clock("24:00"), None);
        assert_eq!(parse_clock("10:75"), None);
        assert_eq!(parse_clock("ab:cd"), None);
        assert_eq!(parse_clock("10:00:00"), None);
    }

    #[test]
    fn test_day_set_parse() {
        let days = DaySet::parse(" M W F");
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Wed));
        assert!(days.contains(Weekday::Fri));
        assert!(!days.contains(Weekday::Tue));
        assert_eq!(days.len(), 3);
        assert_eq!(days.to_string(), "MWF");

        // Saturday/Sunday letters are not weekdays here
        assert!(DaySet::parse("SU").is_empty());
        assert_eq!(DaySet::parse("TR").to_string(), "TR");
    }

    #[test]
    fn test_overlap_same_day() {
        let a = slot("MWF", "10:00", "10:50");
        let b = slot("M", "10:30", "11:20");
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_no_overlap_without_shared_day() {
        let a = slot("MWF", "10:00", "10:50");
        let b = slot("TR", "10:00", "10:50");
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_boundary_touch_is_not_a_conflict() {
        let a = slot("M", "09:00", "10:00");
        let b = slot("M", "10:00", "11:00");
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn test_unknown_times_never_conflict() {
        let tba = slot("MWF", "", "");
        let bad = slot("MWF", "1O:00", "11:00");
        let inverted = slot("MWF", "11:00", "10:00");
        let no_days = slot("", "10:00", "11:00");
        let real = slot("MWF", "10:00", "11:00");

        for unknown in [&tba, &bad, &inverted, &no_days] {
            assert!(unknown.times_unknown);
            assert!(!overlaps(unknown, &real));
            assert!(!overlaps(&real, unknown));
        }
        assert!(!real.times_unknown);
        assert!(real.is_verifiable());
        assert!(!no_days.is_verifiable());
    }

    #[test]
    fn test_slots_conflict() {
        let lecture = vec![slot("MWF", "10:00", "10:50")];
        let sections = vec![slot("T", "09:00", "09:50"), slot("W", "10:40", "11:30")];
        assert!(slots_conflict(&lecture, &sections));
        assert!(!slots_conflict(&lecture, &sections[..1]));
        assert!(!slots_conflict(&lecture, &[]));
    }

    #[test]
    fn test_slot_serialization() {
        let slot = TimeSlot::new("T R", "13:00", "14:15", Some("PHELP 1160".to_string()));
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["days"], "TR");
        assert_eq!(json["startTime"], "13:00");
        assert_eq!(json["location"], "PHELP 1160");
        assert_eq!(json["timesUnknown"], false);
    }
}
