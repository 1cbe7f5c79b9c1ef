use crate::core::normalizer::normalize_course_id;
use crate::core::time::slots_conflict;
use crate::models::{Combination, Course, Schedule};
use std::collections::HashMap;

/// Source of normalized courses for the combination engine
pub trait CourseLookup {
    fn lookup(&self, course_id: &str) -> Option<&Course>;
}

impl CourseLookup for HashMap<String, Course> {
    fn lookup(&self, course_id: &str) -> Option<&Course> {
        self.get(course_id)
            .or_else(|| self.get(&normalize_course_id(course_id)))
    }
}

/// Every internally conflict-free (lecture, section) pairing of one course
///
/// A lecture without secondary sections yields a single lecture-only combination.
/// A section that overlaps its own lecture is unselectable and skipped; a section
/// with no known times cannot be proven to conflict and is always kept.
pub fn find_valid_combinations(course: &Course) -> Vec<Combination<'_>> {
    let mut combinations = Vec::new();

    for group in &course.lectures {
        if group.sections.is_empty() {
            combinations.push(Combination {
                course,
                lecture: &group.lecture,
                section: None,
            });
            continue;
        }

        for section in &group.sections {
            if slots_conflict(&group.lecture.time_slots, &section.time_slots) {
                continue;
            }
            combinations.push(Combination {
                course,
                lecture: &group.lecture,
                section: Some(section),
            });
        }
    }

    combinations
}

/// Lazily enumerate every valid schedule for the requested courses, in input order
///
/// The result is empty when no course is requested, when a course id is unknown,
/// or when any course has no valid combination.
pub fn schedules<'a, L, S>(lookup: &'a L, course_ids: &[S]) -> ScheduleIter<'a>
where
    L: CourseLookup + ?Sized,
    S: AsRef<str>,
{
    if course_ids.is_empty() {
        return ScheduleIter::empty();
    }

    let mut options = Vec::with_capacity(course_ids.len());
    for course_id in course_ids {
        let course_id = course_id.as_ref();

        let Some(course) = lookup.lookup(course_id) else {
            tracing::debug!("Unknown course {}, no schedules possible", course_id);
            return ScheduleIter::empty();
        };

        let combinations = find_valid_combinations(course);
        if combinations.is_empty() {
            tracing::debug!("Course {} has no valid combinations", course_id);
            return ScheduleIter::empty();
        }
        options.push(combinations);
    }

    ScheduleIter::new(options)
}

/// Every valid schedule, materialized
pub fn generate_all_schedules<'a, L, S>(lookup: &'a L, course_ids: &[S]) -> Vec<Schedule<'a>>
where
    L: CourseLookup + ?Sized,
    S: AsRef<str>,
{
    schedules(lookup, course_ids).collect()
}

/// True when no two meeting windows of the schedule overlap.
///
/// Windows are bucketed per weekday so only same-day meetings are compared.
pub fn is_conflict_free(schedule: &[Combination<'_>]) -> bool {
    let mut by_day: [Vec<(u16, u16)>; 5] = Default::default();

    for slot in schedule.iter().flat_map(|combo| combo.time_slots()) {
        let Some((start, end)) = slot.window() else {
            continue;
        };

        for day in slot.days.iter() {
            let bucket = &mut by_day[day.index()];
            if bucket.iter().any(|&(s, e)| start < e && s < end) {
                return false;
            }
            bucket.push((start, end));
        }
    }

    true
}

/// Streaming cross product over per-course combinations that yields only
/// conflict-free schedules.
///
/// Candidates are visited odometer-style, last course varying fastest, so the
/// order is deterministic for a given input. Dropping the iterator early is the
/// way to stop the search.
#[derive(Debug, Clone)]
pub struct ScheduleIter<'a> {
    options: Vec<Vec<Combination<'a>>>,
    cursor: Vec<usize>,
    exhausted: bool,
    candidates_checked: u64,
}

impl<'a> ScheduleIter<'a> {
    pub fn new(options: Vec<Vec<Combination<'a>>>) -> Self {
        let exhausted = options.is_empty() || options.iter().any(Vec::is_empty);
        let cursor = vec![0; options.len()];

        Self {
            options,
            cursor,
            exhausted,
            candidates_checked: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Size of the full candidate space, saturating at `u64::MAX`
    pub fn candidate_space(&self) -> u64 {
        if self.options.is_empty() {
            return 0;
        }
        self.options
            .iter()
            .fold(1u64, |acc, opts| acc.saturating_mul(opts.len() as u64))
    }

    /// Candidate tuples examined so far, valid or not
    pub fn candidates_checked(&self) -> u64 {
        self.candidates_checked
    }

    fn current(&self) -> Schedule<'a> {
        self.cursor
            .iter()
            .zip(&self.options)
            .map(|(&idx, opts)| opts[idx])
            .collect()
    }

    fn advance(&mut self) {
        for pos in (0..self.cursor.len()).rev() {
            self.cursor[pos] += 1;
            if self.cursor[pos] < self.options[pos].len() {
                return;
            }
            self.cursor[pos] = 0;
        }
        self.exhausted = true;
    }
}

impl<'a> Iterator for ScheduleIter<'a> {
    type Item = Schedule<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let candidate = self.current();
            self.advance();
            self.candidates_checked += 1;

            if is_conflict_free(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::TimeSlot;
    use crate::models::{LectureGroup, SectionKind, SectionOffering};

    fn offering(code: &str, kind: SectionKind, slots: &[(&str, &str, &str)]) -> SectionOffering {
        SectionOffering {
            enroll_code: code.to_string(),
            section_label: code.to_string(),
            instructor: String::new(),
            time_slots: slots
                .iter()
                .map(|(days, start, end)| TimeSlot::new(days, start, end, None))
                .collect(),
            enrolled_count: 0,
            capacity: 30,
            kind,
        }
    }

    fn course(id: &str, lectures: Vec<LectureGroup>) -> Course {
        Course {
            course_id: id.to_string(),
            title: id.to_string(),
            subject_area: String::new(),
            units: 4.0,
            general_education_tags: Default::default(),
            description: String::new(),
            lectures,
        }
    }

    fn group(lecture: SectionOffering, sections: Vec<SectionOffering>) -> LectureGroup {
        LectureGroup { lecture, sections }
    }

    /// Course A: MWF 10:00 lecture with Tue sections S1 (9:00) and S2 (9:30).
    /// Course B: Tue 9:15 lecture.
    fn scenario() -> HashMap<String, Course> {
        let a = course(
            "A",
            vec![group(
                offering("A-LEC", SectionKind::Lecture, &[("MWF", "10:00", "10:50")]),
                vec![
                    offering("A-S1", SectionKind::Secondary, &[("T", "09:00", "09:50")]),
                    offering("A-S2", SectionKind::Secondary, &[("T", "09:30", "10:20")]),
                ],
            )],
        );
        let b = course(
            "B",
            vec![group(
                offering("B-LEC", SectionKind::Lecture, &[("T", "09:15", "10:05")]),
                vec![],
            )],
        );
        HashMap::from([("A".to_string(), a), ("B".to_string(), b)])
    }

    #[test]
    fn test_single_course_keeps_both_sections() {
        let courses = scenario();
        let combos = find_valid_combinations(&courses["A"]);
        let codes: Vec<_> = combos.iter().map(|c| c.enroll_codes()).collect();
        assert_eq!(codes, vec![("A-LEC", Some("A-S1")), ("A-LEC", Some("A-S2"))]);
    }

    #[test]
    fn test_lecture_only_combination() {
        let courses = scenario();
        let combos = find_valid_combinations(&courses["B"]);
        assert_eq!(combos.len(), 1);
        assert!(combos[0].section.is_none());
    }

    #[test]
    fn test_section_conflicting_with_own_lecture_is_excluded() {
        let c = course(
            "C",
            vec![group(
                offering("C-LEC", SectionKind::Lecture, &[("MW", "12:00", "13:15")]),
                vec![
                    offering("C-S1", SectionKind::Secondary, &[("W", "13:00", "13:50")]),
                    offering("C-S2", SectionKind::Secondary, &[("W", "13:15", "14:05")]),
                    offering("C-S3", SectionKind::Secondary, &[]),
                ],
            )],
        );

        let combos = find_valid_combinations(&c);
        let sections: Vec<_> = combos.iter().filter_map(|c| c.section).map(|s| s.enroll_code.as_str()).collect();
        assert_eq!(sections, vec!["C-S2", "C-S3"]);
    }

    #[test]
    fn test_cross_course_conflicts_rejected() {
        let courses = scenario();
        let all = generate_all_schedules(&courses, &["A", "B"]);
        // B's Tue 9:15-10:05 lecture overlaps both of A's Tuesday sections
        assert!(all.is_empty());
    }

    #[test]
    fn test_schedules_positional_in_input_order() {
        let mut courses = scenario();
        courses.insert(
            "D".to_string(),
            course(
                "D",
                vec![
                    group(offering("D-1", SectionKind::Standalone, &[("TR", "14:00", "15:15")]), vec![]),
                    group(offering("D-2", SectionKind::Standalone, &[("MWF", "10:30", "11:20")]), vec![]),
                ],
            ),
        );

        let all = generate_all_schedules(&courses, &["D", "A"]);
        // D-2 collides with A's lecture, so only D-1 pairs with A's two sections
        assert_eq!(all.len(), 2);
        for schedule in &all {
            assert_eq!(schedule[0].course.course_id, "D");
            assert_eq!(schedule[0].lecture.enroll_code, "D-1");
            assert_eq!(schedule[1].course.course_id, "A");
        }
    }

    #[test]
    fn test_unknown_or_empty_input() {
        let courses = scenario();
        let none: [&str; 0] = [];
        assert!(generate_all_schedules(&courses, &none).is_empty());
        assert!(generate_all_schedules(&courses, &["A", "NOPE"]).is_empty());
    }

    #[test]
    fn test_course_without_combinations_blocks_everything() {
        let mut courses = scenario();
        courses.insert(
            "E".to_string(),
            course(
                "E",
                vec![group(
                    offering("E-LEC", SectionKind::Lecture, &[("F", "08:00", "09:50")]),
                    vec![offering("E-S1", SectionKind::Secondary, &[("F", "09:00", "09:50")])],
                )],
            ),
        );
        assert!(find_valid_combinations(&courses["E"]).is_empty());
        assert!(generate_all_schedules(&courses, &["A", "E"]).is_empty());
    }

    #[test]
    fn test_unknown_times_never_block() {
        let mut courses = scenario();
        courses.insert(
            "T".to_string(),
            course(
                "T",
                vec![group(offering("T-1", SectionKind::Standalone, &[("T", "", "")]), vec![])],
            ),
        );

        let all = generate_all_schedules(&courses, &["A", "T"]);
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|s| s[1].lecture.times_unknown()));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut courses = scenario();
        courses.remove("B");
        courses.insert(
            "F".to_string(),
            course(
                "F",
                vec![
                    group(offering("F-1", SectionKind::Standalone, &[("M", "12:00", "12:50")]), vec![]),
                    group(offering("F-2", SectionKind::Standalone, &[("T", "09:45", "10:30")]), vec![]),
                ],
            ),
        );

        fn codes(schedules: Vec<Schedule<'_>>) -> Vec<Vec<String>> {
            schedules
                .iter()
                .map(|s| s.iter().map(|c| format!("{:?}", c.enroll_codes())).collect())
                .collect()
        }

        let first = codes(generate_all_schedules(&courses, &["A", "F"]));
        let second = codes(generate_all_schedules(&courses, &["A", "F"]));
        assert_eq!(first, second);
        // F-2 overlaps both Tuesday sections of A
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_iterator_counts_and_early_stop() {
        let mut courses = scenario();
        courses.remove("B");
        let mut iter = schedules(&courses, &["A"]);
        assert_eq!(iter.candidate_space(), 2);

        let first = iter.next();
        assert!(first.is_some());
        assert_eq!(iter.candidates_checked(), 1);
    }

    #[test]
    fn test_lookup_normalizes_ids() {
        let courses = HashMap::from([("MATH 3A".to_string(), course("MATH 3A", vec![]))]);
        assert!(courses.lookup("  MATH   3A ").is_some());
        assert!(courses.lookup("MATH 3B").is_none());
    }

    #[test]
    fn test_is_conflict_free_day_buckets() {
        let courses = scenario();
        let a = &courses["A"];
        let lecture = &a.lectures[0].lecture;
        let s1 = &a.lectures[0].sections[0];
        let s2 = &a.lectures[0].sections[1];

        let ok = vec![Combination { course: a, lecture, section: Some(s1) }];
        assert!(is_conflict_free(&ok));

        // Two Tuesday sections taken together overlap 9:30-9:50
        let clash = vec![
            Combination { course: a, lecture, section: Some(s1) },
            Combination { course: a, lecture: s2, section: None },
        ];
        assert!(!is_conflict_free(&clash));
    }
}
