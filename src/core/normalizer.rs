use crate::models::catalog::{RawClass, RawSection};
use crate::models::{Course, LectureGroup, SectionKind, SectionOffering};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Canonical form of a course id: trimmed, internal whitespace collapsed to one space
pub fn normalize_course_id(course_id: &str) -> String {
    course_id.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the canonical course from every raw record sharing one course id
///
/// Returns `None` when there are no records. Course-level fields come from the first
/// record that carries them; lectures are collected from every record in order.
pub fn normalize_course(records: &[RawClass]) -> Option<Course> {
    let first = records.first()?;

    let general_education_tags: BTreeSet<String> = records
        .iter()
        .flat_map(|record| record.general_education.iter())
        .map(|ge| ge.ge_code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect();

    let units = records
        .iter()
        .map(RawClass::units)
        .find(|units| *units > 0.0)
        .unwrap_or(0.0);

    Some(Course {
        course_id: normalize_course_id(&first.course_id),
        title: first_non_empty(records, |r| &r.title),
        subject_area: first_non_empty(records, |r| &r.subject_area),
        units,
        general_education_tags,
        description: first_non_empty(records, |r| &r.description),
        lectures: lecture_groups(records),
    })
}

fn first_non_empty<'a>(records: &'a [RawClass], field: impl Fn(&'a RawClass) -> &'a String) -> String {
    records
        .iter()
        .map(field)
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Normalize an arbitrary batch of records into courses keyed by canonical course id
pub fn normalize_courses<I>(records: I) -> HashMap<String, Course>
where
    I: IntoIterator<Item = RawClass>,
{
    let mut grouped: HashMap<String, Vec<RawClass>> = HashMap::new();
    for record in records {
        let key = normalize_course_id(&record.course_id);
        if key.is_empty() {
            continue;
        }
        grouped.entry(key).or_default().push(record);
    }

    grouped
        .into_iter()
        .filter_map(|(key, records)| normalize_course(&records).map(|course| (key, course)))
        .collect()
}

/// Lecture groups across all records, deduplicated by lecture enrollment code
fn lecture_groups(records: &[RawClass]) -> Vec<LectureGroup> {
    let mut groups: Vec<LectureGroup> = Vec::new();
    let mut by_code: HashMap<String, usize> = HashMap::new();

    for group in records.iter().flat_map(record_groups) {
        let code = group.lecture.enroll_code.clone();

        let existing = by_code.get(&code).copied().filter(|_| !code.is_empty());

        match existing {
            Some(idx) => merge_sections(&mut groups[idx], group.sections),
            None => {
                if !code.is_empty() {
                    by_code.insert(code, groups.len());
                }
                let mut group = group;
                dedup_sections(&mut group.sections);
                groups.push(group);
            }
        }
    }

    groups
}

/// Lecture groups contributed by a single record.
///
/// The record is the unit of association: secondary sections attach to the lecture
/// that precedes them in the same record (or to the record's first lecture when
/// they come before any lecture). Instructor names play no part.
fn record_groups(record: &RawClass) -> Vec<LectureGroup> {
    let sections = &record.class_sections;

    if !sections.iter().any(RawSection::is_lecture_tag) {
        // Nothing is tagged: each section stands alone. With a single section this
        // is the degenerate one-section course.
        return sections
            .iter()
            .map(|section| LectureGroup {
                lecture: offering(section, SectionKind::Standalone),
                sections: Vec::new(),
            })
            .collect();
    }

    let mut groups: Vec<LectureGroup> = Vec::new();
    let mut leading: Vec<SectionOffering> = Vec::new();

    for section in sections {
        if section.is_lecture_tag() {
            groups.push(LectureGroup {
                lecture: offering(section, SectionKind::Lecture),
                sections: Vec::new(),
            });
        } else {
            let secondary = offering(section, SectionKind::Secondary);
            match groups.last_mut() {
                Some(group) => group.sections.push(secondary),
                None => leading.push(secondary),
            }
        }
    }

    if let Some(first) = groups.first_mut() {
        leading.append(&mut first.sections);
        first.sections = leading;
    }

    groups
}

fn merge_sections(group: &mut LectureGroup, incoming: Vec<SectionOffering>) {
    group.sections.extend(incoming);
    dedup_sections(&mut group.sections);
}

/// Drop repeated enrollment codes, keeping the first occurrence
fn dedup_sections(sections: &mut Vec<SectionOffering>) {
    let mut seen = HashSet::new();
    sections.retain(|s| s.enroll_code.is_empty() || seen.insert(s.enroll_code.clone()));
}

fn offering(section: &RawSection, kind: SectionKind) -> SectionOffering {
    SectionOffering {
        enroll_code: section.enroll_code.trim().to_string(),
        section_label: section.section.trim().to_string(),
        instructor: section.primary_instructor().trim().to_string(),
        time_slots: section.time_slots(),
        enrolled_count: section.enrolled_total,
        capacity: section.max_enroll,
        kind,
    }
}
