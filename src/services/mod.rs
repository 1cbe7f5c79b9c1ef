// Service exports
pub mod cache;
pub mod catalog;
pub mod course_service;

pub use cache::{CacheError, CacheKey, CacheStats, CatalogCache};
pub use catalog::{CatalogClient, CatalogError};
pub use course_service::{search_limit, CourseService, DetailsError, CourseSet, MAX_FILTER_INPUTS, MAX_FILTER_RESULTS};
