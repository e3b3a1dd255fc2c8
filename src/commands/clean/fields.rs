use super::*;

/// Flags raised by a code-like field, one per failure mode.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CodeFieldFlags {
    pub(crate) missing: QualityFlag,
    pub(crate) header_leak: QualityFlag,
    pub(crate) bad_format: QualityFlag,
}

pub(crate) const SYSTEM_FLAGS: CodeFieldFlags = CodeFieldFlags {
    missing: QualityFlag::SystemMissing,
    header_leak: QualityFlag::SystemHeaderLeak,
    bad_format: QualityFlag::SystemBadFormat,
};

pub(crate) const COMPONENT_FLAGS: CodeFieldFlags = CodeFieldFlags {
    missing: QualityFlag::ComponentMissing,
    header_leak: QualityFlag::ComponentHeaderLeak,
    bad_format: QualityFlag::ComponentBadFormat,
};

/// System and Component share one shape: present, not boilerplate, and
/// matching a fixed code format.
pub(crate) struct CodeFieldValidator {
    max_len: usize,
    letters_only: bool,
    pattern: Regex,
    reserved_words: HashSet<String>,
    flags: CodeFieldFlags,
}

impl CodeFieldValidator {
    pub(crate) fn new(
        max_len: usize,
        letters_only: bool,
        pattern: &str,
        reserved_words: &[String],
        flags: CodeFieldFlags,
    ) -> Result<Self> {
        Ok(Self {
            max_len,
            letters_only,
            pattern: Regex::new(pattern)
                .with_context(|| format!("failed to compile field regex: {pattern}"))?,
            reserved_words: reserved_words
                .iter()
                .map(|word| word.trim().to_uppercase())
                .collect(),
            flags,
        })
    }

    pub(crate) fn validate(
        &self,
        normalizer: &ValueNormalizer,
        raw: &str,
    ) -> std::result::Result<String, QualityFlag> {
        let Some(code) = normalizer.code(raw, self.max_len, self.letters_only) else {
            return Err(self.flags.missing);
        };

        if self.reserved_words.contains(&code) {
            return Err(self.flags.header_leak);
        }
        if !self.pattern.is_match(&code) {
            return Err(self.flags.bad_format);
        }

        Ok(code)
    }
}

pub(crate) struct CauseValidator {
    max_len: usize,
    pattern: Regex,
}

impl CauseValidator {
    pub(crate) fn new(rules: &CleaningRules) -> Result<Self> {
        Ok(Self {
            max_len: rules.cause_max_len,
            pattern: Regex::new(&rules.cause_pattern).with_context(|| {
                format!("failed to compile cause regex: {}", rules.cause_pattern)
            })?,
        })
    }

    pub(crate) fn validate(
        &self,
        normalizer: &ValueNormalizer,
        raw: &str,
    ) -> std::result::Result<String, QualityFlag> {
        normalizer
            .code(raw, self.max_len, true)
            .filter(|code| self.pattern.is_match(code))
            .ok_or(QualityFlag::BadCause)
    }
}

pub(crate) struct ReportableVocabulary {
    tokens: HashMap<String, Reportable>,
}

impl ReportableVocabulary {
    pub(crate) fn new(rules: &CleaningRules) -> Self {
        let mut tokens = HashMap::new();
        for token in &rules.iris_yes_tokens {
            tokens.insert(token.trim().to_lowercase(), Reportable::Yes);
        }
        for token in &rules.iris_no_tokens {
            tokens.insert(token.trim().to_lowercase(), Reportable::No);
        }
        // canonical spellings are always accepted
        tokens.entry("yes".to_string()).or_insert(Reportable::Yes);
        tokens.entry("no".to_string()).or_insert(Reportable::No);

        Self { tokens }
    }

    pub(crate) fn validate(
        &self,
        normalizer: &ValueNormalizer,
        raw: &str,
    ) -> std::result::Result<Reportable, QualityFlag> {
        normalizer
            .value(raw)
            .and_then(|value| self.tokens.get(&value.to_lowercase()).copied())
            .ok_or(QualityFlag::IrisMissing)
    }
}
