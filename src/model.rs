use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Row recovered by the extractor, before any cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ler: String,
    #[serde(rename = "Cause", default, deserialize_with = "lenient_string")]
    pub cause: String,
    #[serde(rename = "System", default, deserialize_with = "lenient_string")]
    pub system: String,
    #[serde(rename = "Component", default, deserialize_with = "lenient_string")]
    pub component: String,
    #[serde(rename = "Manufacturer", default, deserialize_with = "lenient_string")]
    pub manufacturer: String,
    #[serde(
        rename = "Reportable_to_IRIS",
        default,
        deserialize_with = "lenient_string"
    )]
    pub reportable_to_iris: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub ler: Option<String>,
    #[serde(rename = "Cause")]
    pub cause: Option<String>,
    #[serde(rename = "System")]
    pub system: Option<String>,
    #[serde(rename = "Component")]
    pub component: Option<String>,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Reportable_to_IRIS")]
    pub reportable_to_iris: Option<Reportable>,
    pub flags: Vec<QualityFlag>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Reportable {
    Yes,
    No,
}

impl Reportable {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    BadCause,
    SystemMissing,
    SystemHeaderLeak,
    SystemBadFormat,
    ComponentMissing,
    ComponentHeaderLeak,
    ComponentBadFormat,
    ManufacturerMissing,
    ManufacturerOverLen,
    ManufacturerGibberishOrCode,
    IrisMissing,
    RecordLowQuality,
}

impl QualityFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadCause => "bad_cause",
            Self::SystemMissing => "system_missing",
            Self::SystemHeaderLeak => "system_header_leak",
            Self::SystemBadFormat => "system_bad_format",
            Self::ComponentMissing => "component_missing",
            Self::ComponentHeaderLeak => "component_header_leak",
            Self::ComponentBadFormat => "component_bad_format",
            Self::ManufacturerMissing => "manufacturer_missing",
            Self::ManufacturerOverLen => "manufacturer_over_len",
            Self::ManufacturerGibberishOrCode => "manufacturer_gibberish_or_code",
            Self::IrisMissing => "iris_missing",
            Self::RecordLowQuality => "record_low_quality",
        }
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNullCount {
    pub field: String,
    pub nulls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagCount {
    pub flag: QualityFlag,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    pub record_count: usize,
    pub null_counts: Vec<FieldNullCount>,
    pub flag_counts: Vec<FlagCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub ler: String,
    pub filename: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub report_count: usize,
    pub reports: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractPaths {
    pub input_dir: String,
    pub raw_output: String,
    pub clean_output: String,
    pub manifest_path: String,
    pub rules_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractCounts {
    pub report_count: usize,
    pub extracted_count: usize,
    pub miss_count: usize,
    pub read_failure_count: usize,
    pub cleaned_count: usize,
    pub deduplicated_count: usize,
    pub dropped_without_ler: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyCount {
    pub strategy: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMiss {
    pub ler: String,
    pub header_found: bool,
    pub candidate_line_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadFailure {
    pub ler: String,
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: ExtractPaths,
    pub counts: ExtractCounts,
    pub strategy_counts: Vec<StrategyCount>,
    pub misses: Vec<ExtractionMiss>,
    pub read_failures: Vec<ReadFailure>,
    pub stats: CleaningStats,
    pub source_hashes: Vec<ReportEntry>,
    pub warnings: Vec<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    })
}
