use super::domain::{Company, CompanyId, NewCompany};
use crate::board::repository::RepositoryError;

/// Storage abstraction for company accounts.
///
/// `insert` reports a duplicate name or email as [`RepositoryError::Conflict`] and
/// stores nothing.
pub trait CompanyRepository: Send + Sync {
    fn insert(&self, company: NewCompany) -> Result<Company, RepositoryError>;
    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Company>, RepositoryError>;
    fn set_logo(&self, id: CompanyId, logo_path: &str) -> Result<(), RepositoryError>;
}
