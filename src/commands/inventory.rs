use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{ChartEntry, ChartInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let charts_dir = charts_dir(&args.cache_root, args.charts_dir.as_deref());
    let manifest = build_manifest(&charts_dir)?;

    if args.dry_run {
        info!(
            chart_count = manifest.chart_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args.manifest_path.unwrap_or_else(|| {
        args.cache_root
            .join("manifests")
            .join("chart_inventory.json")
    });

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(chart_count = manifest.chart_count, "inventory completed");

    Ok(())
}

pub fn charts_dir(cache_root: &Path, override_dir: Option<&Path>) -> PathBuf {
    override_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cache_root.join("charts"))
}

pub fn build_manifest(charts_dir: &Path) -> Result<ChartInventoryManifest> {
    let mut chart_paths = discover_charts(charts_dir)?;
    chart_paths.sort();

    if chart_paths.is_empty() {
        bail!("no chart PDFs found in {}", charts_dir.display());
    }

    let mut charts = Vec::with_capacity(chart_paths.len());
    for path in chart_paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let size_bytes = fs::metadata(&path)
            .with_context(|| format!("failed to inspect {}", path.display()))?
            .len();
        let sha256 = sha256_file(&path)?;

        charts.push(ChartEntry {
            filename,
            size_bytes,
            sha256,
        });
    }

    Ok(ChartInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: charts_dir.display().to_string(),
        chart_count: charts.len(),
        charts,
    })
}

fn discover_charts(charts_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut charts = Vec::new();

    let entries = fs::read_dir(charts_dir)
        .with_context(|| format!("failed to read {}", charts_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", charts_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            charts.push(path);
        }
    }

    Ok(charts)
}
