use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use tracing::info;

use crate::cli::JobsArgs;
use crate::model::JobRecord;

use super::extract::{get_job, list_jobs};

pub fn run(args: JobsArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.cache_root.join("racechart.sqlite"));

    if !db_path.exists() {
        bail!("no jobs database at {}", db_path.display());
    }

    let connection = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    if let Some(job_id) = args.job_id {
        let Some(record) = get_job(&connection, job_id)? else {
            bail!("job {job_id} not found");
        };
        log_job(&record);
        return Ok(());
    }

    let limit = args.limit.max(1);
    let page = args.page.max(1);
    let offset = (page - 1) * limit;

    // Fetch one extra row to learn whether another page exists.
    let mut records = list_jobs(&connection, limit + 1, offset)?;
    let next_page = records.len() > limit;
    records.truncate(limit);

    for record in &records {
        log_job(record);
    }

    info!(
        page,
        limit,
        listed = records.len(),
        next_page,
        "job listing complete"
    );

    Ok(())
}

fn log_job(record: &JobRecord) {
    info!(
        job_id = record.job_id,
        title = %record.title,
        status = %record.status,
        source = %record.source_path,
        sha256 = %record.source_sha256,
        csv = %record.csv_path.clone().unwrap_or_default(),
        rows = record.row_count.unwrap_or_default(),
        error = %record.error.clone().unwrap_or_default(),
        created_at = %record.created_at,
        completed_at = %record.completed_at.clone().unwrap_or_default(),
        "job"
    );
}
