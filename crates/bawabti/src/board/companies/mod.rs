//! Company accounts: registration, password login and logo uploads.

pub mod credentials;
pub mod domain;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;

pub use credentials::{basic_authorization, CompanyCredentials};
pub use domain::{Company, CompanyId, CompanyLogin, CompanyRegistration, NewCompany};
pub use password::Argon2Params;
pub use repository::CompanyRepository;
pub use router::company_router;
pub use service::{CompanyService, CompanyServiceError};
