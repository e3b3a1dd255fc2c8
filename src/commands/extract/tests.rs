use std::fs;

use super::*;
use crate::rules::CleaningRules;

const HEADER: &str = "CAUSE SYSTEM COMPONENT MANUFACTURER REPORTABLE TO IRIS";

fn extractor() -> HeaderAnchoredExtractor {
    HeaderAnchoredExtractor::new(&ExtractionRules::default()).expect("default rules compile")
}

fn expect_row(outcome: ExtractionOutcome) -> (ParsedRow, RowStrategy) {
    match outcome {
        ExtractionOutcome::Row { row, strategy } => (row, strategy),
        ExtractionOutcome::Miss { .. } => panic!("expected a row, got a miss"),
    }
}

#[test]
fn clean_table_row_is_read_from_first_line() {
    let text = format!(
        "13. ABSTRACT\nPump seal failure.\n{HEADER}\nF RCP PUMP1 Flowserve Y\n\
         14. SUPPLEMENTAL REPORT EXPECTED"
    );

    let (row, strategy) = expect_row(extractor().extract(&text));
    assert_eq!(strategy, RowStrategy::LeadingLines);
    assert_eq!(
        row,
        ParsedRow {
            cause: "F".to_string(),
            system: "RCP".to_string(),
            component: "PUMP1".to_string(),
            manufacturer: "Flowserve".to_string(),
            reportable: Reportable::Yes,
        }
    );
}

#[test]
fn last_header_occurrence_anchors_the_table() {
    let text = format!(
        "{HEADER}\nX ZZ DECOY Acme Y\nnarrative resumes here\n\n{HEADER}\nB AB PMP Westinghouse N\n"
    );

    let (row, _) = expect_row(extractor().extract(&text));
    assert_eq!(row.cause, "B");
    assert_eq!(row.component, "PMP");
    assert_eq!(row.manufacturer, "Westinghouse");
    assert_eq!(row.reportable, Reportable::No);
}

#[test]
fn header_tolerates_ocr_variants() {
    for header in [
        "Cause System Component Manufactur Reportable to IR1S",
        "cause  system\tcomponent manufacturer reportable to Ir15",
        "CAUSE SYSTEM COMPONENT MANUFACTURER REPORTABLE TO IRLS",
    ] {
        let text = format!("Preamble text Y\n{header}\nA BA ISV Crane No\n");
        let (row, _) = expect_row(extractor().extract(&text));
        assert_eq!(row.system, "BA", "header variant: {header}");
        assert_eq!(row.manufacturer, "Crane");
    }
}

#[test]
fn numbered_section_bounds_the_table_region() {
    let text = format!("{HEADER}\n14. NARRATIVE\nF RCP PUMP1 Flowserve Y\n");

    assert_eq!(
        extractor().extract(&text),
        ExtractionOutcome::Miss {
            header_found: true,
            candidate_line_count: 0,
        }
    );
}

#[test]
fn form_feed_ends_the_table_row() {
    let text = format!("{HEADER}\nF RCP PUMP1 Flowserve Y\x0cPage 2 narrative text\n");

    let (row, strategy) = expect_row(extractor().extract(&text));
    assert_eq!(strategy, RowStrategy::LeadingLines);
    assert_eq!(row.manufacturer, "Flowserve");
    assert_eq!(row.reportable, Reportable::Yes);
}

#[test]
fn normalize_treats_unicode_line_separators_as_newlines() {
    let normalized = extractor().normalize("A\x0bB\x0cC\u{85}D\u{2028}E\u{2029}F\x1cG");
    assert_eq!(normalized, "A\nB\nC\nD\nE\nF\nG");
}

#[test]
fn yes_no_line_is_found_beyond_leading_lines() {
    let text = format!(
        "{HEADER}\nPage 3 of 4\nForm NRC 366A\ncontinued from previous page\n\
         B CB V-12 Copes Vulcan No\n"
    );

    let (row, strategy) = expect_row(extractor().extract(&text));
    assert_eq!(strategy, RowStrategy::YesNoLines);
    assert_eq!(row.component, "V-12");
    assert_eq!(row.manufacturer, "Copes Vulcan");
    assert_eq!(row.reportable, Reportable::No);
}

#[test]
fn wrapped_manufacturer_is_recovered_by_joining_lines() {
    let text = format!("{HEADER}\nF RCP PUMP1 Byron\nJackson Y\n");

    let (row, strategy) = expect_row(extractor().extract(&text));
    assert_eq!(strategy, RowStrategy::JoinedLeadingLines);
    assert_eq!(row.manufacturer, "Byron Jackson");
    assert_eq!(row.reportable, Reportable::Yes);
}

#[test]
fn missing_header_falls_back_to_whole_text() {
    let (row, _) = expect_row(extractor().extract("X AB VLV Fisher Controls n"));
    assert_eq!(row.manufacturer, "Fisher Controls");
    assert_eq!(row.reportable, Reportable::No);
}

#[test]
fn unparseable_region_reports_candidate_lines() {
    let text = format!("{HEADER}\nno table\nwas provided\n");

    assert_eq!(
        extractor().extract(&text),
        ExtractionOutcome::Miss {
            header_found: true,
            candidate_line_count: 2,
        }
    );
}

#[test]
fn row_parser_requires_five_tokens_and_yes_no_terminal() {
    let parser = RowParser::new(&ExtractionRules::default());

    assert!(parser.parse("F RCP PUMP1 Y").is_none());
    assert!(parser.parse("F RCP PUMP1 Flowserve Maybe").is_none());

    let row = parser
        .parse("f rcp pump1 Flow Serve Corp yes")
        .expect("lowercase row should parse");
    assert_eq!(row.cause, "f");
    assert_eq!(row.manufacturer, "Flow Serve Corp");
    assert_eq!(row.reportable, Reportable::Yes);
}

#[test]
fn normalize_strips_artifacts_and_line_endings() {
    let normalized = extractor().normalize("  A\u{a0}\u{a0}B\r\nC\rD\t\tE\u{f0b7}F  ");
    assert_eq!(normalized, "A B\nC\nD E F");
}

#[test]
fn tally_strategies_reports_every_strategy() {
    let counts = tally_strategies(&[
        RowStrategy::LeadingLines,
        RowStrategy::JoinedLeadingLines,
        RowStrategy::LeadingLines,
    ]);

    assert_eq!(
        counts,
        vec![
            StrategyCount {
                strategy: "leading_lines".to_string(),
                count: 2,
            },
            StrategyCount {
                strategy: "yes_no_lines".to_string(),
                count: 0,
            },
            StrategyCount {
                strategy: "joined_leading_lines".to_string(),
                count: 1,
            },
        ]
    );
}

#[test]
fn process_dir_collects_records_and_misses() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("LER-1.txt"),
        format!("{HEADER}\nF RCP PUMP1 Flowserve Y\n"),
    )
    .expect("write");
    fs::write(dir.path().join("LER-2.txt"), "narrative only").expect("write");
    let mut broken = format!("{HEADER}\nE SJ FCV Fisher").into_bytes();
    broken.extend_from_slice(b"\xff N\n");
    fs::write(dir.path().join("LER-3.txt"), broken).expect("write");

    let batch = process_dir(&extractor(), dir.path()).expect("batch should run");

    assert_eq!(batch.report_count, 3);
    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.records[0].ler, "LER-1");
    assert_eq!(batch.records[0].reportable_to_iris, "Yes");
    assert_eq!(batch.records[1].ler, "LER-3");
    assert_eq!(batch.records[1].manufacturer, "Fisher\u{fffd}");
    assert_eq!(batch.miss_ids(), vec!["LER-2"]);
    assert!(!batch.misses[0].header_found);
    assert!(batch.read_failures.is_empty());
    assert_eq!(batch.source_hashes.len(), 3);
}

#[test]
fn extracted_clean_row_survives_cleaning_unchanged() {
    let text = format!("{HEADER}\nF RCP PUMP1 Flowserve Y\n");
    let (row, _) = expect_row(extractor().extract(&text));
    let raw = row.into_raw_record("LER-100");

    let cleaner = RecordCleaner::new(&CleaningRules::default()).expect("cleaner");
    let cleaned = cleaner.clean_record(&raw);

    assert_eq!(cleaned.ler.as_deref(), Some("LER-100"));
    assert_eq!(cleaned.cause.as_deref(), Some("F"));
    assert_eq!(cleaned.system.as_deref(), Some("RCP"));
    assert_eq!(cleaned.component.as_deref(), Some("PUMP1"));
    assert_eq!(cleaned.manufacturer.as_deref(), Some("Flowserve"));
    assert_eq!(cleaned.reportable_to_iris, Some(Reportable::Yes));
    assert!(cleaned.flags.is_empty());
}

#[cfg(unix)]
#[test]
fn process_dir_follows_symlinked_reports() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = tempfile::tempdir().expect("store dir");
    let target = store.path().join("report.txt");
    fs::write(&target, format!("{HEADER}\nF RCP PUMP1 Flowserve Y\n")).expect("write");
    std::os::unix::fs::symlink(&target, dir.path().join("LER-1.txt")).expect("symlink");

    let batch = process_dir(&extractor(), dir.path()).expect("batch should run");

    assert_eq!(batch.report_count, 1);
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].ler, "LER-1");
    assert!(batch.read_failures.is_empty());
}

#[cfg(unix)]
#[test]
fn unreadable_report_is_recorded_and_batch_continues() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("LER-1.txt"),
        format!("{HEADER}\nF RCP PUMP1 Flowserve Y\n"),
    )
    .expect("write");
    std::os::unix::fs::symlink(dir.path().join("missing.txt"), dir.path().join("LER-2.txt"))
        .expect("symlink");
    fs::write(
        dir.path().join("LER-3.txt"),
        format!("{HEADER}\nB AB PMP Westinghouse N\n"),
    )
    .expect("write");

    let batch = process_dir(&extractor(), dir.path()).expect("batch should run");

    assert_eq!(batch.report_count, 3);
    let extracted = batch
        .records
        .iter()
        .map(|record| record.ler.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(extracted, vec!["LER-1", "LER-3"]);
    assert_eq!(batch.read_failures.len(), 1);
    assert_eq!(batch.read_failures[0].ler, "LER-2");
    assert!(batch.read_failures[0].path.ends_with("LER-2.txt"));
    assert!(!batch.read_failures[0].error.is_empty());
    assert!(batch.misses.is_empty());
    assert_eq!(batch.source_hashes.len(), 2);
}
