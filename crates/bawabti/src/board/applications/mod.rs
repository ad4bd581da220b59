//! Job application intake: the multipart form, its résumé and intro video, and the
//! applicant records company staff review afterwards.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicantId, ApplicationSubmission, NewApplicant, StatusChange, DEFAULT_STATUS,
};
pub use repository::ApplicantRepository;
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
