use crate::config::DepartmentCodes;
use crate::core::combinations::CourseLookup;
use crate::core::filters::filter_courses_by_schedule;
use crate::core::normalizer::{normalize_course, normalize_course_id, normalize_courses};
use crate::models::{Course, CourseSummary, FormattedOffering, RawClass, SearchRequest, SectionDetails, SectionOffering};
use crate::services::cache::{CacheError, CatalogCache, CacheKey};
use crate::services::catalog::{CatalogClient, CatalogError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Most courses run through the schedule filter per search
pub const MAX_FILTER_INPUTS: usize = 300;
/// Most courses returned by a filtered search
pub const MAX_FILTER_RESULTS: usize = 200;

/// Result cap for a search
///
/// Filtering loads every candidate course in full, so filtered searches browse
/// fewer courses. A text query always caps at 100.
pub fn search_limit(has_query: bool, has_department: bool, filtering: bool) -> usize {
    match (has_query, has_department, filtering) {
        (true, _, _) => 100,
        (false, false, false) => 1000,
        (false, true, false) => 500,
        (false, false, true) => 200,
        (false, true, true) => 150,
    }
}

/// Courses loaded for one request, keyed by normalized course id
#[derive(Debug, Clone, Default)]
pub struct CourseSet {
    courses: HashMap<String, Course>,
}

impl CourseSet {
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, course_id: &str) -> Option<&Course> {
        self.lookup(course_id)
    }
}

impl From<HashMap<String, Course>> for CourseSet {
    fn from(courses: HashMap<String, Course>) -> Self {
        Self { courses }
    }
}

impl CourseLookup for CourseSet {
    fn lookup(&self, course_id: &str) -> Option<&Course> {
        self.courses.lookup(course_id)
    }
}

/// Course data access on top of the catalog and its cache
///
/// Every browse walks the configured department enrollment codes in order; records
/// come from the cache first and from the catalog only on a miss.
pub struct CourseService {
    catalog: CatalogClient,
    cache: Arc<CatalogCache>,
    departments: Vec<DepartmentCodes>,
}

impl CourseService {
    pub fn new(catalog: CatalogClient, cache: Arc<CatalogCache>, departments: Vec<DepartmentCodes>) -> Self {
        Self {
            catalog,
            cache,
            departments,
        }
    }

    /// Names of all configured departments
    pub fn departments(&self) -> Vec<String> {
        self.departments.iter().map(|d| d.name.clone()).collect()
    }

    pub fn catalog_enabled(&self) -> bool {
        self.catalog.is_enabled()
    }

    /// `(department, enrollment code)` pairs, optionally restricted to one department
    fn codes<'s>(&'s self, department: &str) -> impl Iterator<Item = (&'s str, &'s str)> + 's {
        let department = department.trim().to_uppercase();
        self.departments
            .iter()
            .filter(move |d| department.is_empty() || d.name.eq_ignore_ascii_case(&department))
            .flat_map(|d| d.codes.iter().map(move |code| (d.name.as_str(), code.as_str())))
    }

    /// Raw record for one enrollment code, through the cache
    ///
    /// Failures are logged and reported as absent.
    pub async fn record(&self, enroll_code: &str) -> Option<Arc<RawClass>> {
        let enroll_code = enroll_code.trim();
        if !CacheKey::is_valid_code(enroll_code) {
            tracing::debug!("Ignoring malformed enrollment code: {:?}", enroll_code);
            return None;
        }

        match self.cache.get(enroll_code).await {
            Ok(record) => return Some(record),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cached record for {} unreadable: {}", enroll_code, e),
        }

        let record = match self.catalog.fetch_class(enroll_code).await {
            Ok(record) => record,
            Err(CatalogError::Disabled) => return None,
            Err(CatalogError::NotFound(_)) => {
                tracing::debug!("Class {} not in catalog", enroll_code);
                return None;
            }
            Err(e) => {
                tracing::error!("Failed to fetch class {}: {}", enroll_code, e);
                return None;
            }
        };

        match self.cache.set(enroll_code, record.clone()).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Failed to cache class {}: {}", enroll_code, e);
                Some(Arc::new(record))
            }
        }
    }

    /// Unique courses whose subject, id or title contains `query`
    ///
    /// One summary per course id, in department order, stopping at `limit`.
    pub async fn search(&self, query: &str, department: &str, limit: usize) -> Vec<CourseSummary> {
        let query = query.trim().to_lowercase();
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for (dept, code) in self.codes(department) {
            if results.len() >= limit {
                break;
            }

            let Some(record) = self.record(code).await else {
                continue;
            };

            let course_id = normalize_course_id(&record.course_id);
            if course_id.is_empty() || seen.contains(&course_id) {
                continue;
            }

            if !query.is_empty() {
                let haystack = format!("{} {} {}", record.subject_area, course_id, record.title).to_lowercase();
                if !haystack.contains(&query) {
                    continue;
                }
            }

            seen.insert(course_id.clone());
            results.push(CourseSummary {
                course_id,
                title: record.title.clone(),
                subject_area: record.subject_area.clone(),
                units: record.units(),
                department: dept.to_string(),
                conflict_free_combinations: None,
            });
        }

        results
    }

    /// Search, then keep only courses that fit beside the request's selected courses
    pub async fn search_with_schedule(&self, request: &SearchRequest) -> Vec<CourseSummary> {
        let filtering = !request.selected_courses.is_empty();
        let limit = search_limit(!request.q.trim().is_empty(), !request.dept.trim().is_empty(), filtering);
        let mut results = self.search(&request.q, &request.dept, limit).await;

        if !filtering {
            return results;
        }

        let busy = request.busy_slots();
        if busy.is_empty() {
            return results;
        }

        results.truncate(MAX_FILTER_INPUTS);
        let ids: Vec<String> = results.iter().map(|r| r.course_id.clone()).collect();
        let courses = self.load_courses(&ids).await;

        let mut filtered = filter_courses_by_schedule(results, &courses, &busy);
        filtered.truncate(MAX_FILTER_RESULTS);

        tracing::debug!(
            "Schedule filter kept {} of {} courses",
            filtered.len(),
            ids.len()
        );
        filtered
    }

    /// Load and normalize every requested course from all of its catalog records
    ///
    /// Unknown ids are simply absent from the returned set.
    pub async fn load_courses<S: AsRef<str>>(&self, course_ids: &[S]) -> CourseSet {
        let wanted: HashSet<String> = course_ids
            .iter()
            .map(|id| normalize_course_id(id.as_ref()))
            .filter(|id| !id.is_empty())
            .collect();

        if wanted.is_empty() {
            return CourseSet::default();
        }

        let mut records = Vec::new();
        for (_, code) in self.codes("") {
            if let Some(record) = self.record(code).await {
                if wanted.contains(&normalize_course_id(&record.course_id)) {
                    records.push(RawClass::clone(&record));
                }
            }
        }

        CourseSet::from(normalize_courses(records))
    }

    /// One course assembled from every record sharing its id
    pub async fn course(&self, course_id: &str) -> Option<Course> {
        let key = normalize_course_id(course_id);
        self.load_courses(&[course_id])
            .await
            .courses
            .remove(&key)
    }

    /// A lecture and optionally one section, located through the lecture's record
    ///
    /// A requested section code that matches nothing is an error, not an absent section.
    pub async fn section_details(
        &self,
        lecture_code: &str,
        section_code: Option<&str>,
    ) -> Result<SectionDetails, DetailsError> {
        let lecture_code = lecture_code.trim();
        let missing_lecture = || DetailsError::LectureNotFound(lecture_code.to_string());

        let record = self.record(lecture_code).await.ok_or_else(missing_lecture)?;
        let course = normalize_course(std::slice::from_ref(&*record)).ok_or_else(missing_lecture)?;
        let lecture = find_offering(&course, lecture_code).ok_or_else(missing_lecture)?;

        let section = match section_code.map(str::trim) {
            Some(code) => Some(
                find_offering(&course, code).ok_or_else(|| DetailsError::SectionNotFound(code.to_string()))?,
            ),
            None => None,
        };

        Ok(SectionDetails {
            course_id: course.course_id.clone(),
            title: course.title.clone(),
            subject_area: course.subject_area.clone(),
            units: course.units,
            lecture: lecture.into(),
            section: section.map(FormattedOffering::from),
        })
    }
}

/// Lookup failures of `section_details`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetailsError {
    #[error("No lecture with enrollment code {0}")]
    LectureNotFound(String),

    #[error("No section with enrollment code {0}")]
    SectionNotFound(String),
}

fn find_offering<'a>(course: &'a Course, enroll_code: &str) -> Option<&'a SectionOffering> {
    course
        .lectures
        .iter()
        .flat_map(|group| std::iter::once(&group.lecture).chain(group.sections.iter()))
        .find(|offering| offering.enroll_code == enroll_code)
}
