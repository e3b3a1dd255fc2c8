use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::InventoryArgs;
use crate::model::{ReportEntry, ReportInventoryManifest};
use crate::util::{now_utc_string, report_id_from_path, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.input_dir)?;

    if args.dry_run {
        info!(
            report_count = manifest.report_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| PathBuf::from("manifests").join("report_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(report_count = manifest.report_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(input_dir: &Path) -> Result<ReportInventoryManifest> {
    let report_paths = discover_reports(input_dir)?;

    if report_paths.is_empty() {
        bail!("no report text files found in {}", input_dir.display());
    }

    let mut reports = Vec::with_capacity(report_paths.len());
    for path in report_paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;
        let ler = report_id_from_path(&path)
            .with_context(|| format!("cannot derive report id from {}", path.display()))?;
        let sha256 = sha256_file(&path)?;

        reports.push(ReportEntry {
            ler,
            filename,
            sha256,
        });
    }

    Ok(ReportInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: input_dir.display().to_string(),
        report_count: reports.len(),
        reports,
    })
}

/// `.txt` entries directly inside `input_dir` that resolve to regular files or
/// cannot be resolved at all, in sorted path order.
pub(crate) fn discover_reports(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut reports = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if !is_text {
            continue;
        }

        // Follows symlinks. An entry whose target cannot be inspected is kept
        // so the read that follows reports it.
        match fs::metadata(&path) {
            Ok(metadata) if !metadata.is_file() => continue,
            Ok(_) => {}
            Err(error) => {
                warn!(path = %path.display(), error = %error, "cannot inspect report entry");
            }
        }

        reports.push(path);
    }

    reports.sort();
    Ok(reports)
}
