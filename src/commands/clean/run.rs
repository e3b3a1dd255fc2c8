use super::*;

#[derive(Debug, Default)]
pub(crate) struct CleaningOutcome {
    /// Deduplicated records, ready to persist.
    pub(crate) records: Vec<CleanedRecord>,
    pub(crate) dropped_without_ler: usize,
    /// Computed before deduplication, so records without an identifier
    /// still count.
    pub(crate) stats: CleaningStats,
}

pub fn run(args: CleanArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref())?;
    let cleaner = RecordCleaner::new(&rules.cleaning)?;

    let raw: Vec<RawRecord> = read_json(&args.input)?;
    info!(path = %args.input.display(), records = raw.len(), "loaded raw extraction");

    let outcome = clean_batch(&cleaner, &raw);
    let clean_output = args
        .clean_output
        .unwrap_or_else(|| sibling_json_path(&args.input, ".cleaned"));
    write_json_pretty(&clean_output, &outcome.records)?;
    info!(
        path = %clean_output.display(),
        cleaned = outcome.records.len(),
        dropped_without_ler = outcome.dropped_without_ler,
        "wrote cleaned records"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(
        output,
        "Wrote {} (cleaned) -> {}",
        outcome.records.len(),
        clean_output.display()
    )?;
    write_dedup_line(&mut output, &outcome.stats, outcome.records.len())?;
    write_stats_lines(&mut output, &outcome.stats)?;
    output.flush()?;

    Ok(())
}

pub(crate) fn clean_batch(cleaner: &RecordCleaner, raw: &[RawRecord]) -> CleaningOutcome {
    let cleaned = raw
        .iter()
        .map(|record| cleaner.clean_record(record))
        .collect::<Vec<CleanedRecord>>();
    let stats = collect_stats(&cleaned);
    let deduplicated = deduplicate_by_ler(cleaned);

    CleaningOutcome {
        records: deduplicated.records,
        dropped_without_ler: deduplicated.dropped_without_ler,
        stats,
    }
}
