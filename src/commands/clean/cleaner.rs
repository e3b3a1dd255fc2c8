use super::*;

/// Normalizes and validates raw rows field by field. Owns its compiled rule
/// tables; cleaning is a pure function of the input record.
pub(crate) struct RecordCleaner {
    normalizer: ValueNormalizer,
    cause: CauseValidator,
    system: CodeFieldValidator,
    component: CodeFieldValidator,
    manufacturer: ManufacturerFilter,
    reportable: ReportableVocabulary,
    low_quality_min_missing: usize,
}

impl RecordCleaner {
    pub(crate) fn new(rules: &CleaningRules) -> Result<Self> {
        Ok(Self {
            normalizer: ValueNormalizer::new(rules)?,
            cause: CauseValidator::new(rules)?,
            system: CodeFieldValidator::new(
                rules.system_max_len,
                true,
                &rules.system_pattern,
                &rules.system_reserved_words,
                SYSTEM_FLAGS,
            )?,
            component: CodeFieldValidator::new(
                rules.component_max_len,
                false,
                &rules.component_pattern,
                &rules.component_reserved_words,
                COMPONENT_FLAGS,
            )?,
            manufacturer: ManufacturerFilter::new(rules)?,
            reportable: ReportableVocabulary::new(rules),
            low_quality_min_missing: rules.low_quality_min_missing,
        })
    }

    pub(crate) fn clean_record(&self, raw: &RawRecord) -> CleanedRecord {
        let normalizer = &self.normalizer;
        let mut flags = Vec::new();

        let cause = keep_or_flag(self.cause.validate(normalizer, &raw.cause), &mut flags);
        let system = keep_or_flag(self.system.validate(normalizer, &raw.system), &mut flags);
        let component = keep_or_flag(
            self.component.validate(normalizer, &raw.component),
            &mut flags,
        );
        let manufacturer = keep_or_flag(
            self.manufacturer.validate(normalizer, &raw.manufacturer),
            &mut flags,
        );
        let reportable_to_iris = keep_or_flag(
            self.reportable.validate(normalizer, &raw.reportable_to_iris),
            &mut flags,
        );

        let hard_missing = [system.is_none(), component.is_none(), manufacturer.is_none()]
            .into_iter()
            .filter(|missing| *missing)
            .count();
        if hard_missing >= self.low_quality_min_missing {
            flags.push(QualityFlag::RecordLowQuality);
        }

        CleanedRecord {
            ler: normalizer.value(&raw.ler),
            cause,
            system,
            component,
            manufacturer,
            reportable_to_iris,
            flags,
        }
    }

    #[cfg(test)]
    pub(crate) fn manufacturer_filter(&self) -> &ManufacturerFilter {
        &self.manufacturer
    }
}

fn keep_or_flag<T>(
    checked: std::result::Result<T, QualityFlag>,
    flags: &mut Vec<QualityFlag>,
) -> Option<T> {
    match checked {
        Ok(value) => Some(value),
        Err(flag) => {
            flags.push(flag);
            None
        }
    }
}
