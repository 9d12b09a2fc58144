use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::chart;
use crate::cli::ExtractArgs;
use crate::commands::inventory;
use crate::model::{
    ChartInventoryManifest, DocumentOutcome, ExtractCounts, ExtractPaths, ExtractRunManifest,
    JobStatus,
};
use crate::util::{ensure_directory, now_utc_string, utc_compact_string, write_json_pretty};

use super::job_store::{
    DB_SCHEMA_VERSION, complete_job, configure_connection, ensure_schema, fail_job, insert_job,
};
use super::pages::{collect_tool_versions, extract_pages};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let cache_root = args.cache_root.clone();
    let manifest_dir = cache_root.join("manifests");
    ensure_directory(&manifest_dir)?;

    let charts_dir = inventory::charts_dir(&cache_root, args.charts_dir.as_deref());
    let inventory_manifest_path = args
        .inventory_manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join("chart_inventory.json"));
    let extract_manifest_path = args.extract_manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!("extract_run_{}.json", utc_compact_string(started_ts)))
    });
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| cache_root.join("racechart.sqlite"));
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| cache_root.join("outputs"));

    info!(cache_root = %cache_root.display(), run_id = %run_id, "starting extract run");

    let inventory = load_or_refresh_inventory(
        &charts_dir,
        &inventory_manifest_path,
        args.refresh_inventory,
    )?;

    let tool_versions = collect_tool_versions()?;

    let connection = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;

    let mut counts = ExtractCounts {
        chart_count: inventory.chart_count,
        ..ExtractCounts::default()
    };
    let mut documents = Vec::with_capacity(inventory.charts.len());
    let mut warnings = Vec::new();

    for entry in &inventory.charts {
        let chart_path = charts_dir.join(&entry.filename);
        let job_id = insert_job(
            &connection,
            &entry.filename,
            &chart_path.display().to_string(),
            &entry.sha256,
        )?;

        match process_chart(&chart_path, args.max_pages_per_doc, &output_dir, job_id) {
            Ok(processed) => {
                complete_job(
                    &connection,
                    job_id,
                    &processed.csv_path,
                    processed.row_count as i64,
                )?;

                counts.processed_chart_count += 1;
                counts.jobs_completed += 1;
                counts.pages_total += processed.page_count;
                counts.pages_skipped_no_header += processed.pages_skipped;
                counts.result_rows += processed.row_count;
                counts.rows_without_trainer += processed.rows_without_trainer;

                info!(
                    job_id,
                    chart = %entry.filename,
                    pages = processed.page_count,
                    rows = processed.row_count,
                    csv = %processed.csv_path,
                    "chart processed"
                );

                documents.push(DocumentOutcome {
                    filename: entry.filename.clone(),
                    sha256: entry.sha256.clone(),
                    job_id,
                    status: JobStatus::Completed.as_str().to_string(),
                    page_count: processed.page_count,
                    row_count: processed.row_count,
                    csv_path: Some(processed.csv_path),
                    error: None,
                });
            }
            Err(error) => {
                let reason = format!("{error:#}");
                warn!(job_id, chart = %entry.filename, error = %reason, "chart failed");

                // The status update is best-effort; a second failure is
                // observed, not retried.
                if let Err(update_error) = fail_job(&connection, job_id, &reason) {
                    warn!(job_id, error = %update_error, "failed to record job failure");
                }

                counts.failed_chart_count += 1;
                counts.jobs_failed += 1;
                warnings.push(format!("{}: {reason}", entry.filename));

                documents.push(DocumentOutcome {
                    filename: entry.filename.clone(),
                    sha256: entry.sha256.clone(),
                    job_id,
                    status: JobStatus::Failed.as_str().to_string(),
                    page_count: 0,
                    row_count: 0,
                    csv_path: None,
                    error: Some(reason),
                });
            }
        }
    }

    let updated_at = now_utc_string();
    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        db_schema_version: DB_SCHEMA_VERSION.to_string(),
        status: "completed".to_string(),
        started_at,
        updated_at,
        command: render_extract_command(&args),
        tool_versions,
        paths: ExtractPaths {
            cache_root: cache_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            inventory_manifest_path: inventory_manifest_path.display().to_string(),
            db_path: db_path.display().to_string(),
            output_dir: output_dir.display().to_string(),
        },
        counts,
        documents,
        warnings,
    };

    write_json_pretty(&extract_manifest_path, &manifest)?;

    info!(path = %extract_manifest_path.display(), "wrote extract run manifest");
    info!(
        charts = manifest.counts.chart_count,
        completed = manifest.counts.jobs_completed,
        failed = manifest.counts.jobs_failed,
        rows = manifest.counts.result_rows,
        "extract run finished"
    );

    Ok(())
}

struct ProcessedChart {
    page_count: usize,
    pages_skipped: usize,
    row_count: usize,
    rows_without_trainer: usize,
    csv_path: String,
}

fn process_chart(
    chart_path: &Path,
    max_pages_per_doc: Option<usize>,
    output_dir: &Path,
    job_id: i64,
) -> Result<ProcessedChart> {
    if !chart_path.exists() {
        bail!("chart file not found: {}", chart_path.display());
    }

    let pages = extract_pages(chart_path, max_pages_per_doc)?;
    let rows = chart::extract_table(&pages);
    let encoded = chart::encode_csv(&rows);

    let csv_name = format!("job-{}-{}.csv", job_id, utc_compact_string(Utc::now()));
    let csv_path = store_csv(output_dir, &csv_name, &encoded)?;

    Ok(ProcessedChart {
        page_count: pages.len(),
        pages_skipped: pages
            .iter()
            .filter(|page| chart::parse_race_header(page.as_str()).is_none())
            .count(),
        row_count: rows.len(),
        rows_without_trainer: rows.iter().filter(|row| row.trainer.is_empty()).count(),
        csv_path: csv_path.display().to_string(),
    })
}

fn store_csv(output_dir: &Path, name: &str, encoded: &[u8]) -> Result<PathBuf> {
    ensure_directory(output_dir)?;
    let path = output_dir.join(name);
    fs::write(&path, encoded).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn load_or_refresh_inventory(
    charts_dir: &Path,
    inventory_manifest_path: &Path,
    refresh_inventory: bool,
) -> Result<ChartInventoryManifest> {
    if refresh_inventory || !inventory_manifest_path.exists() {
        let manifest = inventory::build_manifest(charts_dir)?;
        write_json_pretty(inventory_manifest_path, &manifest)?;
        info!(
            path = %inventory_manifest_path.display(),
            chart_count = manifest.chart_count,
            "refreshed inventory manifest"
        );
        return Ok(manifest);
    }

    let raw = fs::read(inventory_manifest_path)
        .with_context(|| format!("failed to read {}", inventory_manifest_path.display()))?;
    let manifest: ChartInventoryManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", inventory_manifest_path.display()))?;

    info!(
        path = %inventory_manifest_path.display(),
        chart_count = manifest.chart_count,
        "loaded existing inventory manifest"
    );

    Ok(manifest)
}

pub(super) fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "racechart".to_string(),
        "extract".to_string(),
        "--cache-root".to_string(),
        args.cache_root.display().to_string(),
    ];

    if let Some(path) = &args.charts_dir {
        command.push("--charts-dir".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.inventory_manifest_path {
        command.push("--inventory-manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.extract_manifest_path {
        command.push("--extract-manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.db_path {
        command.push("--db-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.output_dir {
        command.push("--output-dir".to_string());
        command.push(path.display().to_string());
    }
    if args.refresh_inventory {
        command.push("--refresh-inventory".to_string());
    }
    if let Some(max_pages) = args.max_pages_per_doc {
        command.push("--max-pages-per-doc".to_string());
        command.push(max_pages.to_string());
    }

    command.join(" ")
}
