use super::*;

use crate::model::{FieldNullCount, FlagCount};

type FieldAccessor = fn(&CleanedRecord) -> bool;

const NULLABLE_FIELDS: [(&str, FieldAccessor); 5] = [
    ("Cause", |record: &CleanedRecord| record.cause.is_none()),
    ("System", |record: &CleanedRecord| record.system.is_none()),
    ("Component", |record: &CleanedRecord| record.component.is_none()),
    ("Manufacturer", |record: &CleanedRecord| record.manufacturer.is_none()),
    ("Reportable_to_IRIS", |record: &CleanedRecord| {
        record.reportable_to_iris.is_none()
    }),
];

pub(crate) fn collect_stats(records: &[CleanedRecord]) -> CleaningStats {
    let null_counts = NULLABLE_FIELDS
        .iter()
        .map(|(field, is_null)| FieldNullCount {
            field: field.to_string(),
            nulls: records.iter().filter(|&record| is_null(record)).count(),
        })
        .collect();

    let mut tally = HashMap::<QualityFlag, usize>::new();
    for flag in records.iter().flat_map(|record| record.flags.iter()) {
        *tally.entry(*flag).or_default() += 1;
    }

    let mut flag_counts = tally
        .into_iter()
        .map(|(flag, count)| FlagCount { flag, count })
        .collect::<Vec<FlagCount>>();
    flag_counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.flag.as_str().cmp(b.flag.as_str()))
    });

    CleaningStats {
        record_count: records.len(),
        null_counts,
        flag_counts,
    }
}
