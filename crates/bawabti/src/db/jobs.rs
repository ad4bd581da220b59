use chrono::Utc;
use rusqlite::{params, OptionalExtension, Params, Row};

use super::{Database, DatabaseError};
use crate::board::companies::CompanyId;
use crate::board::jobs::{Job, JobId, JobRepository, NewJob};
use crate::board::repository::RepositoryError;

const COLUMNS: &str = "id, company_id, title, category, job_type, experience_level, \
                       salary_min, salary_max, location, description, requirements, deadline, \
                       is_active, created_at";

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: JobId(row.get("id")?),
        company_id: CompanyId(row.get("company_id")?),
        title: row.get("title")?,
        category: row.get("category")?,
        job_type: row.get("job_type")?,
        experience_level: row.get("experience_level")?,
        salary_min: row.get("salary_min")?,
        salary_max: row.get("salary_max")?,
        location: row.get("location")?,
        description: row.get("description")?,
        requirements: row.get("requirements")?,
        deadline: row.get("deadline")?,
        is_active: row.get("is_active")?,
        created_at: row.get("created_at")?,
    })
}

impl Database {
    fn list_jobs<P: Params>(&self, filter: &str, params: P) -> Result<Vec<Job>, DatabaseError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM jobs WHERE {filter} ORDER BY created_at DESC, id DESC"
            ))?;
            let jobs = stmt
                .query_map(params, job_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(jobs)
        })
    }
}

impl JobRepository for Database {
    fn insert(&self, job: NewJob) -> Result<Job, RepositoryError> {
        let stored = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO jobs (company_id, title, category, job_type, experience_level,
                 salary_min, salary_max, location, description, requirements, deadline,
                 created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    job.company_id.0,
                    job.title,
                    job.category,
                    job.job_type,
                    job.experience_level,
                    job.salary_min,
                    job.salary_max,
                    job.location,
                    job.description,
                    job.requirements,
                    job.deadline,
                    Utc::now(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            Ok(conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM jobs WHERE id = ?1"),
                    [id],
                    job_from_row,
                )
                .optional()?)
        })?;
        stored.ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let job = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM jobs WHERE id = ?1"),
                    [id.0],
                    job_from_row,
                )
                .optional()?)
        })?;
        Ok(job)
    }

    fn list_active(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(self.list_jobs("is_active = 1", params![])?)
    }

    fn list_for_company(&self, company_id: CompanyId) -> Result<Vec<Job>, RepositoryError> {
        Ok(self.list_jobs("company_id = ?1", [company_id.0])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::companies::{CompanyRepository, NewCompany};
    use chrono::NaiveDate;

    fn company(db: &Database, email: &str) -> CompanyId {
        CompanyRepository::insert(
            db,
            NewCompany {
                name: email.to_string(),
                email: email.to_string(),
                password_hash: "$argon2id$stub".to_string(),
                phone: None,
                website: None,
                city: None,
                address: None,
                description: None,
            },
        )
        .expect("company")
        .id
    }

    fn posting(company_id: CompanyId, title: &str) -> NewJob {
        NewJob {
            company_id,
            title: title.to_string(),
            category: "engineering".to_string(),
            job_type: "full_time".to_string(),
            experience_level: None,
            salary_min: Some(300),
            salary_max: Some(600),
            location: Some("Taiz".to_string()),
            description: None,
            requirements: None,
            deadline: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    #[test]
    fn listings_are_newest_first_and_active_only() {
        let db = Database::open_in_memory().expect("db");
        let owner = company(&db, "hr@saba.ye");
        let first = JobRepository::insert(&db, posting(owner, "Civil Engineer")).expect("first");
        let second =
            JobRepository::insert(&db, posting(owner, "Site Supervisor")).expect("second");
        db.with_conn(|conn| {
            conn.execute("UPDATE jobs SET is_active = 0 WHERE id = ?1", [first.id.0])?;
            Ok(())
        })
        .expect("deactivate");

        let active = db.list_active().expect("active");
        assert_eq!(
            active.iter().map(|job| job.id).collect::<Vec<_>>(),
            vec![second.id]
        );

        let all = JobRepository::list_for_company(&db, owner).expect("company jobs");
        assert_eq!(
            all.iter().map(|job| job.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert_eq!(second.deadline, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn jobs_need_an_existing_company() {
        let db = Database::open_in_memory().expect("db");
        let err = JobRepository::insert(&db, posting(CompanyId(77), "Ghost"))
            .expect_err("foreign key");
        assert!(matches!(err, RepositoryError::Unavailable(_)));
        assert_eq!(JobRepository::fetch(&db, JobId(1)).expect("fetch"), None);
    }
}
