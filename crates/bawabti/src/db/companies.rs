use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

use super::Database;
use crate::board::companies::{Company, CompanyId, CompanyRepository, NewCompany};
use crate::board::repository::RepositoryError;

const COLUMNS: &str = "id, name, email, password_hash, phone, website, city, address, \
                       description, logo_path, is_active, created_at";

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: CompanyId(row.get("id")?),
        name: row.get("name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        phone: row.get("phone")?,
        website: row.get("website")?,
        city: row.get("city")?,
        address: row.get("address")?,
        description: row.get("description")?,
        logo_path: row.get("logo_path")?,
        is_active: row.get("is_active")?,
        created_at: row.get("created_at")?,
    })
}

fn select_one(
    conn: &Connection,
    clause: &str,
    value: &dyn ToSql,
) -> rusqlite::Result<Option<Company>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM companies WHERE {clause}"),
        [value],
        company_from_row,
    )
    .optional()
}

impl CompanyRepository for Database {
    fn insert(&self, company: NewCompany) -> Result<Company, RepositoryError> {
        let stored = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO companies (name, email, password_hash, phone, website, city,
                 address, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    company.name,
                    company.email,
                    company.password_hash,
                    company.phone,
                    company.website,
                    company.city,
                    company.address,
                    company.description,
                    Utc::now(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            Ok(select_one(conn, "id = ?1", &id)?)
        })?;
        stored.ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.with_conn(|conn| Ok(select_one(conn, "id = ?1", &id.0)?))?)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Company>, RepositoryError> {
        Ok(self.with_conn(|conn| Ok(select_one(conn, "email = ?1", &email)?))?)
    }

    fn set_logo(&self, id: CompanyId, logo_path: &str) -> Result<(), RepositoryError> {
        let changed = self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE companies SET logo_path = ?1 WHERE id = ?2",
                params![logo_path, id.0],
            )?)
        })?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
