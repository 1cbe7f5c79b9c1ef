use crate::core::combinations::CourseLookup;
use crate::core::time::{slots_conflict, TimeSlot};
use crate::models::{CombinationRef, Course, CourseSummary};

/// Lecture/section choices of a course that clear every busy slot
///
/// A lecture with no sections is a choice on its own. Slots without verifiable
/// times never conflict, so TBA lectures and sections stay selectable.
#[inline]
pub fn conflict_free_combinations(course: &Course, busy: &[TimeSlot]) -> Vec<CombinationRef> {
    let mut found = Vec::new();

    for (lecture_index, group) in course.lectures.iter().enumerate() {
        if slots_conflict(&group.lecture.time_slots, busy) {
            continue;
        }

        if group.sections.is_empty() {
            found.push(CombinationRef {
                lecture_index,
                section_index: None,
                lecture_code: group.lecture.enroll_code.clone(),
                section_code: None,
            });
            continue;
        }

        for (section_index, section) in group.sections.iter().enumerate() {
            if !slots_conflict(&section.time_slots, busy) {
                found.push(CombinationRef {
                    lecture_index,
                    section_index: Some(section_index),
                    lecture_code: group.lecture.enroll_code.clone(),
                    section_code: Some(section.enroll_code.clone()),
                });
            }
        }
    }

    found
}

/// Keep only the courses that still fit beside the student's current picks
///
/// Surviving summaries carry their conflict-free combinations. Courses the
/// lookup does not know are dropped. With no busy slots the input is returned
/// unchanged.
pub fn filter_courses_by_schedule<L>(
    courses: Vec<CourseSummary>,
    lookup: &L,
    busy: &[TimeSlot],
) -> Vec<CourseSummary>
where
    L: CourseLookup + ?Sized,
{
    if busy.is_empty() {
        return courses;
    }

    courses
        .into_iter()
        .filter_map(|mut summary| {
            let course = lookup.lookup(&summary.course_id)?;
            let combinations = conflict_free_combinations(course, busy);
            if combinations.is_empty() {
                return None;
            }
            summary.conflict_free_combinations = Some(combinations);
            Some(summary)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LectureGroup, SectionKind, SectionOffering};
    use std::collections::HashMap;

    fn offering(code: &str, days: &str, start: &str, end: &str) -> SectionOffering {
        SectionOffering {
            enroll_code: code.to_string(),
            section_label: code.to_string(),
            instructor: String::new(),
            time_slots: vec![TimeSlot::new(days, start, end, None)],
            enrolled_count: 0,
            capacity: 30,
            kind: SectionKind::Lecture,
        }
    }

    fn create_test_course() -> Course {
        Course {
            course_id: "CHEM 1A".to_string(),
            title: "GENERAL CHEMISTRY".to_string(),
            subject_area: "CHEM".to_string(),
            units: 5.0,
            general_education_tags: Default::default(),
            description: String::new(),
            lectures: vec![
                LectureGroup {
                    lecture: offering("100", "MWF", "09:00", "09:50"),
                    sections: vec![offering("101", "T", "10:00", "10:50"), offering("102", "R", "10:00", "10:50")],
                },
                LectureGroup {
                    lecture: offering("200", "TR", "14:00", "15:15"),
                    sections: vec![],
                },
            ],
        }
    }

    fn summary(course_id: &str) -> CourseSummary {
        CourseSummary {
            course_id: course_id.to_string(),
            title: String::new(),
            subject_area: String::new(),
            units: 0.0,
            department: "CHEM".to_string(),
            conflict_free_combinations: None,
        }
    }

    #[test]
    fn test_conflict_free_combinations() {
        let course = create_test_course();
        let busy = vec![TimeSlot::new("T", "10:30", "11:00", None)];

        let found = conflict_free_combinations(&course, &busy);
        let pairs: Vec<_> = found.iter().map(|c| (c.lecture_index, c.section_index)).collect();
        assert_eq!(pairs, vec![(0, Some(1)), (1, None)]);
        assert_eq!(found[0].section_code.as_deref(), Some("102"));
    }

    #[test]
    fn test_conflicting_lecture_removes_its_sections() {
        let course = create_test_course();
        let busy = vec![TimeSlot::new("W", "09:30", "10:00", None)];

        let found = conflict_free_combinations(&course, &busy);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lecture_code, "200");
    }

    #[test]
    fn test_tba_busy_slot_blocks_nothing() {
        let course = create_test_course();
        let busy = vec![TimeSlot::new("MTWRF", "", "", None)];
        assert_eq!(conflict_free_combinations(&course, &busy).len(), 3);
    }

    #[test]
    fn test_filter_courses_by_schedule() {
        let mut courses = HashMap::new();
        courses.insert("CHEM 1A".to_string(), create_test_course());

        let all_day = vec![
            TimeSlot::new("MWF", "08:00", "12:00", None),
            TimeSlot::new("TR", "13:00", "16:00", None),
        ];
        let kept = filter_courses_by_schedule(vec![summary("CHEM 1A"), summary("NOPE 1")], &courses, &all_day);
        assert!(kept.is_empty());

        let evening = vec![TimeSlot::new("MW", "18:00", "19:00", None)];
        let kept = filter_courses_by_schedule(vec![summary("CHEM 1A"), summary("NOPE 1")], &courses, &evening);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].conflict_free_combinations.as_ref().map(Vec::len), Some(3));

        let untouched = filter_courses_by_schedule(vec![summary("NOPE 1")], &courses, &[]);
        assert_eq!(untouched.len(), 1);
        assert!(untouched[0].conflict_free_combinations.is_none());
    }
}
