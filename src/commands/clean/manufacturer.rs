use super::*;

pub(crate) struct ManufacturerFilter {
    fixes: Vec<(Regex, String)>,
    whitespace_runs: Regex,
    max_len: usize,
    code: Regex,
    single_letter_run: Regex,
    letter_space_repeat: Regex,
    thresholds: GibberishThresholds,
}

impl ManufacturerFilter {
    pub(crate) fn new(rules: &CleaningRules) -> Result<Self> {
        let mut fixes = Vec::with_capacity(rules.manufacturer_fixes.len());
        for fix in &rules.manufacturer_fixes {
            let pattern = Regex::new(&fix.pattern).with_context(|| {
                format!("failed to compile manufacturer fix regex: {}", fix.pattern)
            })?;
            fixes.push((pattern, fix.replacement.clone()));
        }

        let thresholds = rules.gibberish.clone();
        let single_letter_pattern = format!(
            r"(?:\b[A-Za-z]\b[ ,;:\-]*){{{},}}",
            thresholds.single_letter_run.max(1)
        );
        let letter_space_pattern = format!(
            r"(?:[A-Za-z]\s+){{{},}}",
            thresholds.letter_space_repeats.max(1)
        );

        Ok(Self {
            fixes,
            whitespace_runs: Regex::new(r"\s{2,}")
                .context("failed to compile whitespace run regex")?,
            max_len: rules.manufacturer_max_len,
            code: Regex::new(&rules.manufacturer_code_pattern).with_context(|| {
                format!(
                    "failed to compile manufacturer code regex: {}",
                    rules.manufacturer_code_pattern
                )
            })?,
            single_letter_run: Regex::new(&single_letter_pattern)
                .with_context(|| format!("failed to compile regex: {single_letter_pattern}"))?,
            letter_space_repeat: Regex::new(&letter_space_pattern)
                .with_context(|| format!("failed to compile regex: {letter_space_pattern}"))?,
            thresholds,
        })
    }

    pub(crate) fn validate(
        &self,
        normalizer: &ValueNormalizer,
        raw: &str,
    ) -> std::result::Result<String, QualityFlag> {
        let Some(mut name) = normalizer.value(raw) else {
            return Err(QualityFlag::ManufacturerMissing);
        };

        for (pattern, replacement) in &self.fixes {
            name = pattern.replace_all(&name, replacement.as_str()).into_owned();
        }
        let name = self.whitespace_runs.replace_all(&name, " ");
        let name = normalizer.trim_edges(&name);

        if name.chars().count() > self.max_len {
            return Err(QualityFlag::ManufacturerOverLen);
        }
        if self.code.is_match(name) || self.is_gibberish(name) {
            return Err(QualityFlag::ManufacturerGibberishOrCode);
        }

        Ok(name.to_string())
    }

    pub(crate) fn is_gibberish(&self, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }

        let length = value.chars().count();
        if length > self.thresholds.max_len {
            return true;
        }

        let letters = value.chars().filter(|c| c.is_alphabetic()).count();
        let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
        if digits > 0 && (letters as f64 / length as f64) < self.thresholds.min_alpha_ratio {
            return true;
        }

        self.single_letter_run.is_match(value) || self.letter_space_repeat.is_match(value)
    }
}
