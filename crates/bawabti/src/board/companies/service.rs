use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    normalize_email, Company, CompanyId, CompanyLogin, CompanyRegistration, NewCompany,
};
use super::password::{hash_password, verify_password, Argon2Params, PasswordError};
use super::repository::CompanyRepository;
use crate::board::optional_text;
use crate::board::repository::RepositoryError;
use crate::uploads::{
    ArtifactKind, StorageError, StoredArtifact, UploadPipeline, UploadRejection, UploadedFile,
};

const MIN_PASSWORD_LEN: usize = 6;

/// Registration, login and profile media for companies.
pub struct CompanyService<C> {
    repository: Arc<C>,
    uploads: Arc<UploadPipeline>,
    password_params: Argon2Params,
}

impl<C> CompanyService<C>
where
    C: CompanyRepository + 'static,
{
    pub fn new(repository: Arc<C>, uploads: Arc<UploadPipeline>) -> Self {
        Self {
            repository,
            uploads,
            password_params: Argon2Params::default(),
        }
    }

    pub fn with_password_params(mut self, params: Argon2Params) -> Self {
        self.password_params = params;
        self
    }

    pub fn uploads(&self) -> &UploadPipeline {
        &self.uploads
    }

    /// Register a company. A reused name or email is a conflict and stores nothing.
    pub fn register(
        &self,
        registration: CompanyRegistration,
    ) -> Result<Company, CompanyServiceError> {
        let name = registration.name.trim().to_string();
        let email = normalize_email(&registration.email);
        if name.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(CompanyServiceError::MissingFields);
        }
        if !email.contains('@') {
            return Err(CompanyServiceError::InvalidEmail);
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CompanyServiceError::WeakPassword);
        }

        if self.repository.find_by_email(&email)?.is_some() {
            return Err(RepositoryError::Conflict {
                field: "email".to_string(),
            }
            .into());
        }

        let password_hash = hash_password(&registration.password, self.password_params)?;
        let company = self.repository.insert(NewCompany {
            name,
            email,
            password_hash,
            phone: optional_text(registration.phone),
            website: optional_text(registration.website),
            city: optional_text(registration.city),
            address: optional_text(registration.address),
            description: optional_text(registration.description),
        })?;

        info!(company_id = company.id.0, "company registered");
        Ok(company)
    }

    /// Compare the submitted password against the stored hash.
    pub fn authenticate(&self, login: CompanyLogin) -> Result<Company, CompanyServiceError> {
        let email = normalize_email(&login.email);
        let company = self
            .repository
            .find_by_email(&email)?
            .ok_or(CompanyServiceError::InvalidCredentials)?;

        if !verify_password(&login.password, &company.password_hash)? {
            warn!(company_id = company.id.0, "failed login");
            return Err(CompanyServiceError::InvalidCredentials);
        }
        if !company.is_active {
            return Err(CompanyServiceError::Inactive);
        }

        Ok(company)
    }

    pub fn get(&self, id: CompanyId) -> Result<Company, CompanyServiceError> {
        let company = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(company)
    }

    /// Validate and store a logo, then point the company record at it.
    pub fn upload_logo(
        &self,
        id: CompanyId,
        file: Option<UploadedFile>,
    ) -> Result<StoredArtifact, CompanyServiceError> {
        let company = self.get(id)?;
        let file = file.ok_or(CompanyServiceError::MissingFile)?;
        let upload = self.uploads.validate(ArtifactKind::Logo, file)?;
        let stored = self.uploads.persist(&upload)?;

        if let Err(err) = self.repository.set_logo(company.id, &stored.public_path) {
            warn!(
                company_id = company.id.0,
                orphan = %stored.disk_path.display(),
                error = %err,
                "logo stored but company record not updated"
            );
            return Err(err.into());
        }

        Ok(stored)
    }
}

/// Error raised by the company service.
#[derive(Debug, thiserror::Error)]
pub enum CompanyServiceError {
    #[error("company name, email and password are required")]
    MissingFields,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("company account is inactive")]
    Inactive,
    #[error("no file received")]
    MissingFile,
    #[error(transparent)]
    Rejected(#[from] UploadRejection),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
