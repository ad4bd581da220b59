//! Job listings and the fixed category/type catalog they draw from.

pub mod catalog;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use catalog::{CatalogEntry, JobCatalog};
pub use domain::{Job, JobId, JobPosting, NewJob};
pub use repository::JobRepository;
pub use router::job_router;
pub use service::{JobService, JobServiceError};
