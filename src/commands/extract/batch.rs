use super::*;

#[derive(Debug, Default)]
pub(crate) struct ExtractionBatch {
    pub(crate) report_count: usize,
    pub(crate) records: Vec<RawRecord>,
    pub(crate) misses: Vec<ExtractionMiss>,
    pub(crate) read_failures: Vec<ReadFailure>,
    pub(crate) strategies_used: Vec<RowStrategy>,
    pub(crate) source_hashes: Vec<ReportEntry>,
}

impl ExtractionBatch {
    pub(crate) fn miss_ids(&self) -> Vec<&str> {
        self.misses.iter().map(|miss| miss.ler.as_str()).collect()
    }
}

pub(crate) fn process_dir(
    extractor: &HeaderAnchoredExtractor,
    input_dir: &Path,
) -> Result<ExtractionBatch> {
    let report_paths = discover_reports(input_dir)?;
    let mut batch = ExtractionBatch {
        report_count: report_paths.len(),
        ..ExtractionBatch::default()
    };

    for path in report_paths {
        let ler = report_id_from_path(&path)
            .unwrap_or_else(|| path.file_stem().unwrap_or_default().to_string_lossy().into_owned());

        let (text, bytes) = match read_text_lossy(&path) {
            Ok(contents) => contents,
            Err(error) => {
                let message = format!("{error:#}");
                warn!(
                    ler = %ler,
                    path = %path.display(),
                    error = %message,
                    "skipping unreadable report"
                );
                batch.read_failures.push(ReadFailure {
                    ler,
                    path: path.display().to_string(),
                    error: message,
                });
                continue;
            }
        };

        batch.source_hashes.push(ReportEntry {
            ler: ler.clone(),
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            sha256: sha256_bytes(&bytes),
        });

        process_report(extractor, &ler, &text, &mut batch);
    }

    Ok(batch)
}

pub(crate) fn process_report(
    extractor: &HeaderAnchoredExtractor,
    ler: &str,
    text: &str,
    batch: &mut ExtractionBatch,
) {
    match extractor.extract(text) {
        ExtractionOutcome::Row { row, strategy } => {
            debug!(ler = %ler, strategy = strategy.as_str(), "extracted component row");
            batch.records.push(row.into_raw_record(ler));
            batch.strategies_used.push(strategy);
        }
        ExtractionOutcome::Miss {
            header_found,
            candidate_line_count,
        } => {
            warn!(
                ler = %ler,
                header_found,
                candidate_line_count,
                "no component row matched"
            );
            batch.misses.push(ExtractionMiss {
                ler: ler.to_string(),
                header_found,
                candidate_line_count,
            });
        }
    }
}
