use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered companies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub i64);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered employer. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub logo_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration form as submitted by a company.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyRegistration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Validated registration ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyLogin {
    pub email: String,
    pub password: String,
}

/// Lower-cased, trimmed email used for uniqueness and lookups.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
