/// Error enumeration shared by the company, job and applicant repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{field} is already registered")]
    Conflict { field: String },
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
