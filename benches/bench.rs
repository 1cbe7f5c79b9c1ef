// Criterion benchmarks for the schedule engine

use course_planner::core::{
    combinations::generate_all_schedules, scoring::score_schedule, time::TimeSlot, Optimizer,
};
use course_planner::models::{
    Course, LectureGroup, PreferenceProfile, SectionKind, SectionOffering, SpreadPreference, TimeOfDay,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;

const DAY_PATTERNS: [&str; 4] = ["MWF", "TR", "MW", "F"];

fn create_offering(code: String, kind: SectionKind, days: &str, hour: usize) -> SectionOffering {
    SectionOffering {
        enroll_code: code.clone(),
        section_label: code,
        instructor: "STAFF".to_string(),
        time_slots: vec![TimeSlot::new(
            days,
            &format!("{:02}:00", hour),
            &format!("{:02}:50", hour),
            None,
        )],
        enrolled_count: 0,
        capacity: 40,
        kind,
    }
}

/// A course with `lectures` lectures of `sections` sections each, spread over the week
fn create_course(id: usize, lectures: usize, sections: usize) -> Course {
    let groups = (0..lectures)
        .map(|l| LectureGroup {
            lecture: create_offering(
                format!("{}-L{}", id, l),
                SectionKind::Lecture,
                DAY_PATTERNS[(id + l) % 2],
                8 + (id * 3 + l * 5) % 11,
            ),
            sections: (0..sections)
                .map(|s| {
                    create_offering(
                        format!("{}-L{}-S{}", id, l, s),
                        SectionKind::Secondary,
                        DAY_PATTERNS[2 + (id + s) % 2],
                        8 + (id + s * 2) % 12,
                    )
                })
                .collect(),
        })
        .collect();

    Course {
        course_id: format!("C{}", id),
        title: format!("COURSE {}", id),
        subject_area: "BENCH".to_string(),
        units: 4.0,
        general_education_tags: Default::default(),
        description: String::new(),
        lectures: groups,
    }
}

fn create_catalog(course_count: usize) -> (HashMap<String, Course>, Vec<String>) {
    let courses: HashMap<String, Course> = (0..course_count)
        .map(|i| {
            let course = create_course(i, 3, 4);
            (course.course_id.clone(), course)
        })
        .collect();
    let ids = (0..course_count).map(|i| format!("C{}", i)).collect();
    (courses, ids)
}

fn create_preferences() -> PreferenceProfile {
    PreferenceProfile {
        spread_preference: Some(SpreadPreference::Centered),
        preferred_start_time: Some("10:00".to_string()),
        preferred_end_time: Some("15:00".to_string()),
        avoid_early_morning: true,
        minimize_gaps: true,
        max_classes_per_day: Some(3),
        preferred_time_of_day: Some(TimeOfDay::Afternoon),
        ..Default::default()
    }
}

fn bench_overlap(c: &mut Criterion) {
    let a = TimeSlot::new("MWF", "10:00", "10:50", None);
    let b = TimeSlot::new("WF", "10:30", "11:20", None);

    c.bench_function("slot_overlap", |bench| {
        bench.iter(|| black_box(&a).overlaps(black_box(&b)));
    });
}

fn bench_scoring(c: &mut Criterion) {
    let (courses, ids) = create_catalog(4);
    let schedules = generate_all_schedules(&courses, &ids);
    let prefs = create_preferences();
    let optimizer = Optimizer::default();

    c.bench_function("score_schedule", |b| {
        b.iter(|| {
            for schedule in &schedules {
                black_box(score_schedule(black_box(schedule), &prefs, optimizer.weights()));
            }
        });
    });
}

fn bench_optimize(c: &mut Criterion) {
    let optimizer = Optimizer::default();
    let prefs = create_preferences();

    let mut group = c.benchmark_group("optimize");

    for course_count in [2, 3, 4, 5].iter() {
        let (courses, ids) = create_catalog(*course_count);

        group.bench_with_input(
            BenchmarkId::new("top_10", course_count),
            course_count,
            |b, _| {
                b.iter(|| optimizer.optimize(black_box(&courses), black_box(&ids), &prefs, black_box(10)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_overlap, bench_scoring, bench_optimize);

criterion_main!(benches);
