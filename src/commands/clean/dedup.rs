use super::*;

#[derive(Debug, Default)]
pub(crate) struct Deduplicated {
    pub(crate) records: Vec<CleanedRecord>,
    pub(crate) dropped_without_ler: usize,
}

/// Keeps one record per `ler`. A later record replaces an earlier one in
/// full, but the slot stays where the identifier first appeared.
pub(crate) fn deduplicate_by_ler(cleaned: Vec<CleanedRecord>) -> Deduplicated {
    let mut positions = HashMap::<String, usize>::new();
    let mut result = Deduplicated::default();

    for record in cleaned {
        let Some(ler) = record.ler.clone() else {
            result.dropped_without_ler += 1;
            continue;
        };

        match positions.get(&ler) {
            Some(&index) => result.records[index] = record,
            None => {
                positions.insert(ler, result.records.len());
                result.records.push(record);
            }
        }
    }

    result
}
