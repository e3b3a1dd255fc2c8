use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

use crate::cli::ExtractArgs;
use crate::commands::clean::{RecordCleaner, clean_batch};
use crate::commands::inventory::discover_reports;
use crate::commands::summary::{write_dedup_line, write_miss_line, write_stats_lines};
use crate::model::{
    ExtractCounts, ExtractPaths, ExtractRunManifest, ExtractionMiss, RawRecord, ReadFailure,
    ReportEntry, Reportable, StrategyCount,
};
use crate::rules::{ExtractionRules, load_rules};
use crate::util::{
    now_utc_string, read_text_lossy, report_id_from_path, sha256_bytes, sibling_json_path,
    utc_compact_string, write_json_pretty,
};

mod batch;
mod extractor;
mod row;
mod run;
mod strategy;
#[cfg(test)]
mod tests;

pub use run::run;

use batch::*;
use extractor::*;
use row::*;
use strategy::*;
