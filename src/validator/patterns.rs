use regex::{Regex, RegexBuilder};

/// Phrases the upstream speech-to-text model is known to invent for audio
/// it could not parse: generic sign-offs, like/subscribe calls, filler
/// framing. Matched case-insensitively.
///
/// The library is configuration, not logic: deployments append their own
/// expressions (e.g. stray names the model keeps inserting) via
/// `validation.extra_patterns`.
const DEFAULT_PATTERNS: &[&str] = &[
    r"thank you so much for coming",
    r"thank you\.? thank you",
    r"i hope you(?:'ll| will)? have a (?:very )?good (?:rest of your )?day",
    r"see you (?:all )?(?:on|in) the next (?:one|day|time)",
    r"please (?:like|subscribe|comment)",
    r"don'?t forget to (?:like|subscribe|hit the bell)",
    r"if you enjoyed this (?:video|content)",
    r"(?:this|that) (?:is|was) (?:a|the) (?:really |very )?(?:long|short) list",
    r"here'?s a really long list",
    r"subtitles (?:by|provided by) \w+",
];

/// Compiled fabrication-phrase library.
pub struct FabricationPatterns {
    patterns: Vec<Regex>,
}

impl FabricationPatterns {
    /// The built-in library plus any deployment-specific expressions.
    /// Fails on an invalid expression so a bad config surfaces at startup,
    /// never inside the validator.
    pub fn with_extra(extra: &[String]) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(DEFAULT_PATTERNS.len() + extra.len());
        for expr in DEFAULT_PATTERNS.iter().copied() {
            patterns.push(compile(expr)?);
        }
        for expr in extra {
            patterns.push(compile(expr)?);
        }
        Ok(Self { patterns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Regex> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for FabricationPatterns {
    fn default() -> Self {
        // The built-in expressions are known-good; compilation cannot fail.
        Self::with_extra(&[]).expect("built-in fabrication patterns must compile")
    }
}

fn compile(expr: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(expr).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_compiles() {
        let patterns = FabricationPatterns::default();
        assert_eq!(patterns.len(), DEFAULT_PATTERNS.len());
        assert!(!patterns.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let patterns = FabricationPatterns::default();
        assert!(patterns
            .iter()
            .any(|p| p.is_match("THANK YOU SO MUCH FOR COMING")));
    }

    #[test]
    fn extra_patterns_are_appended() {
        let patterns =
            FabricationPatterns::with_extra(&[r"(?:divyendra|yooki)".to_string()]).unwrap();
        assert_eq!(patterns.len(), DEFAULT_PATTERNS.len() + 1);
        assert!(patterns.iter().any(|p| p.is_match("and then Yooki said")));
    }

    #[test]
    fn invalid_extra_pattern_is_rejected() {
        assert!(FabricationPatterns::with_extra(&["(unclosed".to_string()]).is_err());
    }
}
