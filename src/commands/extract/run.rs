use super::*;

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let clean_output = args
        .clean_output
        .clone()
        .unwrap_or_else(|| sibling_json_path(&args.output, ".cleaned"));
    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| sibling_json_path(&args.output, ".run"));

    info!(input_dir = %args.input_dir.display(), run_id = %run_id, "starting extraction");

    let rules = load_rules(args.rules.as_deref())?;
    let extractor = HeaderAnchoredExtractor::new(&rules.extraction)?;
    let cleaner = RecordCleaner::new(&rules.cleaning)?;

    let batch = process_dir(&extractor, &args.input_dir)?;
    if batch.report_count == 0 {
        bail!("no report text files found in {}", args.input_dir.display());
    }

    write_json_pretty(&args.output, &batch.records)?;
    info!(
        path = %args.output.display(),
        extracted = batch.records.len(),
        misses = batch.misses.len(),
        read_failures = batch.read_failures.len(),
        "wrote raw extraction"
    );

    let cleaning = clean_batch(&cleaner, &batch.records);
    write_json_pretty(&clean_output, &cleaning.records)?;
    info!(
        path = %clean_output.display(),
        cleaned = cleaning.records.len(),
        dropped_without_ler = cleaning.dropped_without_ler,
        "wrote cleaned records"
    );

    let mut warnings = batch
        .read_failures
        .iter()
        .map(|failure| format!("failed to read {}: {}", failure.path, failure.error))
        .collect::<Vec<String>>();
    let empty_tables = batch
        .misses
        .iter()
        .filter(|miss| miss.header_found && miss.candidate_line_count == 0)
        .count();
    if empty_tables > 0 {
        warnings.push(format!(
            "{empty_tables} reports had a table header followed by no candidate lines"
        ));
    }

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        paths: ExtractPaths {
            input_dir: args.input_dir.display().to_string(),
            raw_output: args.output.display().to_string(),
            clean_output: clean_output.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
            rules_path: args.rules.as_ref().map(|path| path.display().to_string()),
        },
        counts: ExtractCounts {
            report_count: batch.report_count,
            extracted_count: batch.records.len(),
            miss_count: batch.misses.len(),
            read_failure_count: batch.read_failures.len(),
            cleaned_count: cleaning.stats.record_count,
            deduplicated_count: cleaning.records.len(),
            dropped_without_ler: cleaning.dropped_without_ler,
        },
        strategy_counts: tally_strategies(&batch.strategies_used),
        misses: batch.misses.clone(),
        read_failures: batch.read_failures.clone(),
        stats: cleaning.stats.clone(),
        source_hashes: batch.source_hashes.clone(),
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(
        output,
        "Wrote {} (raw) -> {}",
        batch.records.len(),
        args.output.display()
    )?;
    write_miss_line(&mut output, &batch.miss_ids())?;
    writeln!(
        output,
        "Wrote {} (cleaned) -> {}",
        cleaning.records.len(),
        clean_output.display()
    )?;
    write_dedup_line(&mut output, &cleaning.stats, cleaning.records.len())?;
    write_stats_lines(&mut output, &cleaning.stats)?;
    output.flush()?;

    Ok(())
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "ler-extract".to_string(),
        "extract".to_string(),
        args.input_dir.display().to_string(),
        "--output".to_string(),
        args.output.display().to_string(),
    ];

    if let Some(path) = &args.clean_output {
        command.push("--clean-output".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.rules {
        command.push("--rules".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
