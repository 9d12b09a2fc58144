use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::{ChartInventoryManifest, ExtractRunManifest};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.cache_root.join("manifests");
    let inventory_path = manifest_dir.join("chart_inventory.json");
    let db_path = args.cache_root.join("racechart.sqlite");

    info!(cache_root = %args.cache_root.display(), "status requested");

    if inventory_path.exists() {
        let raw = fs::read(&inventory_path)
            .with_context(|| format!("failed to read {}", inventory_path.display()))?;
        let inventory: ChartInventoryManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", inventory_path.display()))?;

        info!(
            generated_at = %inventory.generated_at,
            chart_count = inventory.chart_count,
            "loaded inventory manifest"
        );
    } else {
        warn!(path = %inventory_path.display(), "inventory manifest missing");
    }

    match newest_run_manifest(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                started_at = %manifest.started_at,
                charts = manifest.counts.chart_count,
                completed = manifest.counts.jobs_completed,
                failed = manifest.counts.jobs_failed,
                rows = manifest.counts.result_rows,
                warnings = manifest.warnings.len(),
                "loaded newest extract run manifest"
            );
        }
        None => warn!(path = %manifest_dir.display(), "no extract run manifest found"),
    }

    if db_path.exists() {
        let connection = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;

        let jobs_total = query_count(&connection, "SELECT COUNT(*) FROM jobs").unwrap_or(0);
        let processing = count_by_status(&connection, "processing");
        let completed = count_by_status(&connection, "completed");
        let failed = count_by_status(&connection, "failed");

        info!(
            path = %db_path.display(),
            jobs = jobs_total,
            processing,
            completed,
            failed,
            "database status"
        );
    } else {
        warn!(path = %db_path.display(), "database file missing");
    }

    Ok(())
}

fn newest_run_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut newest: Option<PathBuf> = None;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();

        let is_run_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("extract_run_") && name.ends_with(".json"))
            .unwrap_or(false);

        // Run stamps sort lexicographically, so the max name is the newest.
        if is_run_manifest && newest.as_ref().is_none_or(|current| path > *current) {
            newest = Some(path);
        }
    }

    Ok(newest)
}

fn count_by_status(connection: &Connection, status: &str) -> i64 {
    connection
        .query_row(
            "SELECT COUNT(*) FROM jobs WHERE status = ?1",
            [status],
            |row| row.get(0),
        )
        .unwrap_or(0)
}

fn query_count(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}
