use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::cli::CleanArgs;
use crate::commands::summary::{write_dedup_line, write_stats_lines};
use crate::model::{CleanedRecord, CleaningStats, QualityFlag, RawRecord, Reportable};
use crate::rules::{CleaningRules, GibberishThresholds, load_rules};
use crate::util::{read_json, sibling_json_path, write_json_pretty};

mod cleaner;
mod dedup;
mod fields;
mod manufacturer;
mod normalize;
mod run;
mod stats;

pub use run::run;
pub(crate) use cleaner::RecordCleaner;
pub(crate) use run::clean_batch;
pub(crate) use stats::collect_stats;

use dedup::*;
use fields::*;
use manufacturer::*;
use normalize::*;
