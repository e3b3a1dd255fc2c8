use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::SummaryArgs;
use crate::commands::clean::collect_stats;
use crate::model::{CleanedRecord, CleaningStats};
use crate::util::read_json;

const MISS_PREVIEW_LIMIT: usize = 10;

pub fn run(args: SummaryArgs) -> Result<()> {
    let records: Vec<CleanedRecord> = read_json(&args.input)?;
    let stats = collect_stats(&records);

    info!(
        path = %args.input.display(),
        records = stats.record_count,
        distinct_flags = stats.flag_counts.len(),
        "loaded cleaned records"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &stats)
            .context("failed to serialize summary json output")?;
        writeln!(output)?;
    } else {
        writeln!(output, "Records: {}", stats.record_count)?;
        write_stats_lines(&mut output, &stats)?;
    }
    output.flush()?;

    Ok(())
}

/// Lists the first few unmatched report ids; prints nothing when every
/// report matched.
pub(crate) fn write_miss_line<W: Write>(output: &mut W, misses: &[&str]) -> Result<()> {
    if misses.is_empty() {
        return Ok(());
    }

    let preview = misses
        .iter()
        .take(MISS_PREVIEW_LIMIT)
        .copied()
        .collect::<Vec<&str>>()
        .join(", ");
    let ellipsis = if misses.len() > MISS_PREVIEW_LIMIT {
        " ..."
    } else {
        ""
    };

    writeln!(
        output,
        "[WARN] no match ({}): {preview}{ellipsis}",
        misses.len()
    )?;
    Ok(())
}

/// Relates the statistics, taken before deduplication, to the record count
/// actually written.
pub(crate) fn write_dedup_line<W: Write>(
    output: &mut W,
    stats: &CleaningStats,
    written: usize,
) -> Result<()> {
    let superseded = stats.record_count.saturating_sub(written);
    writeln!(
        output,
        "Stats over {} records before dedup ({superseded} superseded or without ler)",
        stats.record_count
    )?;
    Ok(())
}

pub(crate) fn write_stats_lines<W: Write>(output: &mut W, stats: &CleaningStats) -> Result<()> {
    let nulls = stats
        .null_counts
        .iter()
        .map(|entry| format!("{}={}", entry.field, entry.nulls))
        .collect::<Vec<String>>()
        .join(" ");
    writeln!(output, "Null counts: {nulls}")?;

    if stats.flag_counts.is_empty() {
        writeln!(output, "Flag counts: none")?;
        return Ok(());
    }

    writeln!(output, "Flag counts:")?;
    let width = stats
        .flag_counts
        .iter()
        .map(|entry| entry.flag.as_str().len())
        .max()
        .unwrap_or(0);
    for entry in &stats.flag_counts {
        writeln!(
            output,
            "  {:<width$}  {}",
            entry.flag.as_str(),
            entry.count
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldNullCount, FlagCount, QualityFlag};

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).expect("render should succeed");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn miss_line_truncates_after_ten_ids() {
        let ids = (1..=12).map(|n| format!("LER-{n}")).collect::<Vec<String>>();
        let refs = ids.iter().map(String::as_str).collect::<Vec<&str>>();

        let text = render(|out| write_miss_line(out, &refs));
        assert!(text.starts_with("[WARN] no match (12): LER-1, LER-2"));
        assert!(text.contains("LER-10 ..."));
        assert!(!text.contains("LER-11"));
    }

    #[test]
    fn miss_line_is_silent_without_misses() {
        assert_eq!(render(|out| write_miss_line(out, &[])), "");
    }

    #[test]
    fn dedup_line_reconciles_stats_with_written_records() {
        let stats = CleaningStats {
            record_count: 5,
            ..CleaningStats::default()
        };

        let text = render(|out| write_dedup_line(out, &stats, 3));
        assert_eq!(
            text,
            "Stats over 5 records before dedup (2 superseded or without ler)\n"
        );
    }

    #[test]
    fn stats_lines_list_flags_in_given_order() {
        let stats = CleaningStats {
            record_count: 3,
            null_counts: vec![
                FieldNullCount {
                    field: "System".to_string(),
                    nulls: 2,
                },
                FieldNullCount {
                    field: "Manufacturer".to_string(),
                    nulls: 1,
                },
            ],
            flag_counts: vec![
                FlagCount {
                    flag: QualityFlag::SystemHeaderLeak,
                    count: 2,
                },
                FlagCount {
                    flag: QualityFlag::BadCause,
                    count: 1,
                },
            ],
        };

        let text = render(|out| write_stats_lines(out, &stats));
        let lines = text.lines().collect::<Vec<&str>>();
        assert_eq!(lines[0], "Null counts: System=2 Manufacturer=1");
        assert_eq!(lines[1], "Flag counts:");
        assert_eq!(lines[2], "  system_header_leak  2");
        assert_eq!(lines[3], "  bad_cause           1");
    }
}
