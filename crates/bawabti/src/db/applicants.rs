use chrono::Utc;
use rusqlite::{params, OptionalExtension, Params, Row};

use super::{Database, DatabaseError};
use crate::board::applications::{Applicant, ApplicantId, ApplicantRepository, NewApplicant};
use crate::board::companies::CompanyId;
use crate::board::jobs::JobId;
use crate::board::repository::RepositoryError;

const COLUMNS: &str = "a.id AS id, a.job_id AS job_id, a.full_name AS full_name, \
                       a.email AS email, a.phone AS phone, a.cv_path AS cv_path, \
                       a.video_path AS video_path, a.cover_letter AS cover_letter, \
                       a.status AS status, a.created_at AS created_at";

fn applicant_from_row(row: &Row<'_>) -> rusqlite::Result<Applicant> {
    Ok(Applicant {
        id: ApplicantId(row.get("id")?),
        job_id: row.get::<_, Option<i64>>("job_id")?.map(JobId),
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        cv_path: row.get("cv_path")?,
        video_path: row.get("video_path")?,
        cover_letter: row.get("cover_letter")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

impl Database {
    fn fetch_applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, DatabaseError> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM applicants a WHERE a.id = ?1"),
                    [id.0],
                    applicant_from_row,
                )
                .optional()?)
        })
    }

    fn list_applicants<P: Params>(
        &self,
        join_and_filter: &str,
        params: P,
    ) -> Result<Vec<Applicant>, DatabaseError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM applicants a {join_and_filter} \
                 ORDER BY a.created_at DESC, a.id DESC"
            ))?;
            let applicants = stmt
                .query_map(params, applicant_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(applicants)
        })
    }
}

impl ApplicantRepository for Database {
    fn insert(&self, applicant: NewApplicant) -> Result<Applicant, RepositoryError> {
        let id = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO applicants (job_id, full_name, email, phone, cv_path, video_path,
                 cover_letter, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    applicant.job_id.map(|id| id.0),
                    applicant.full_name,
                    applicant.email,
                    applicant.phone,
                    applicant.cv_path,
                    applicant.video_path,
                    applicant.cover_letter,
                    Utc::now(),
                ],
            )?;
            Ok(ApplicantId(conn.last_insert_rowid()))
        })?;
        self.fetch_applicant(id)?.ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Ok(self.fetch_applicant(id)?)
    }

    fn list_for_job(&self, job_id: JobId) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(self.list_applicants("WHERE a.job_id = ?1", [job_id.0])?)
    }

    fn list_for_company(&self, company_id: CompanyId) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(self.list_applicants(
            "JOIN jobs j ON j.id = a.job_id WHERE j.company_id = ?1",
            [company_id.0],
        )?)
    }

    fn update_status(&self, id: ApplicantId, status: &str) -> Result<Applicant, RepositoryError> {
        let changed = self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE applicants SET status = ?1 WHERE id = ?2",
                params![status, id.0],
            )?)
        })?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.fetch_applicant(id)?.ok_or(RepositoryError::NotFound)
    }
}
