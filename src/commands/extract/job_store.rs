use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{JobRecord, JobStatus};
use crate::util::now_utc_string;

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

pub fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS jobs (
          job_id INTEGER PRIMARY KEY AUTOINCREMENT,
          title TEXT NOT NULL,
          source_path TEXT NOT NULL,
          source_sha256 TEXT NOT NULL,
          status TEXT NOT NULL,
          csv_path TEXT,
          row_count INTEGER,
          error TEXT,
          created_at TEXT NOT NULL,
          completed_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
        CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);
        ",
    )?;

    let now = now_utc_string();
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_updated_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [now],
    )?;

    Ok(())
}

pub fn insert_job(
    connection: &Connection,
    title: &str,
    source_path: &str,
    source_sha256: &str,
) -> Result<i64> {
    connection
        .execute(
            "INSERT INTO jobs(title, source_path, source_sha256, status, created_at)
             VALUES(?1, ?2, ?3, ?4, ?5)",
            params![
                title,
                source_path,
                source_sha256,
                JobStatus::Processing.as_str(),
                now_utc_string()
            ],
        )
        .with_context(|| format!("failed to insert job for {title}"))?;

    Ok(connection.last_insert_rowid())
}

pub fn complete_job(
    connection: &Connection,
    job_id: i64,
    csv_path: &str,
    row_count: i64,
) -> Result<()> {
    connection
        .execute(
            "UPDATE jobs
             SET status = ?1, csv_path = ?2, row_count = ?3, error = NULL, completed_at = ?4
             WHERE job_id = ?5",
            params![
                JobStatus::Completed.as_str(),
                csv_path,
                row_count,
                now_utc_string(),
                job_id
            ],
        )
        .with_context(|| format!("failed to mark job {job_id} completed"))?;
    Ok(())
}

pub fn fail_job(connection: &Connection, job_id: i64, error: &str) -> Result<()> {
    connection
        .execute(
            "UPDATE jobs
             SET status = ?1, error = ?2, completed_at = ?3
             WHERE job_id = ?4",
            params![
                JobStatus::Failed.as_str(),
                error,
                now_utc_string(),
                job_id
            ],
        )
        .with_context(|| format!("failed to mark job {job_id} failed"))?;
    Ok(())
}

pub fn get_job(connection: &Connection, job_id: i64) -> Result<Option<JobRecord>> {
    connection
        .query_row(
            "SELECT job_id, title, source_path, source_sha256, status, csv_path,
                    row_count, error, created_at, completed_at
             FROM jobs WHERE job_id = ?1",
            [job_id],
            job_record_from_row,
        )
        .optional()
        .with_context(|| format!("failed to load job {job_id}"))
}

pub fn list_jobs(connection: &Connection, limit: usize, offset: usize) -> Result<Vec<JobRecord>> {
    let mut statement = connection
        .prepare(
            "SELECT job_id, title, source_path, source_sha256, status, csv_path,
                    row_count, error, created_at, completed_at
             FROM jobs ORDER BY job_id DESC LIMIT ?1 OFFSET ?2",
        )
        .context("failed to prepare job listing")?;

    let records = statement
        .query_map(params![limit as i64, offset as i64], job_record_from_row)
        .context("failed to list jobs")?
        .collect::<rusqlite::Result<Vec<JobRecord>>>()
        .context("failed to read job rows")?;

    Ok(records)
}

fn job_record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        job_id: row.get(0)?,
        title: row.get(1)?,
        source_path: row.get(2)?,
        source_sha256: row.get(3)?,
        status: row.get(4)?,
        csv_path: row.get(5)?,
        row_count: row.get(6)?,
        error: row.get(7)?,
        created_at: row.get(8)?,
        completed_at: row.get(9)?,
    })
}
