//! Transcript validation: detecting and filtering fabricated content
//!
//! The external speech-to-text service sometimes invents text for audio it
//! cannot parse — sign-offs, subscription calls, looping sentences. The
//! validator is the second line of defense behind the anti-fabrication
//! transcription prompt: a pure, deterministic function from raw transcript
//! (+ optional audio duration) to a confidence score, an ordered issue
//! list, and a cleaned transcript.
//!
//! Issues are data, never errors: the validator cannot fail, and an
//! unparseable duration just skips the duration-based checks.

mod patterns;

pub use patterns::FabricationPatterns;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Confidence penalty per fabrication-phrase occurrence.
const FABRICATION_PENALTY: f32 = 0.3;

/// Conversational speech runs 120-180 WPM; above this the model likely
/// invented words.
const MAX_WORDS_PER_MINUTE: f64 = 250.0;
const PACING_PENALTY: f32 = 0.2;

/// A transcript this long for audio this short is physically implausible.
const SHORT_AUDIO_SECS: f64 = 10.0;
const SHORT_AUDIO_MAX_WORDS: usize = 50;
const SHORT_AUDIO_PENALTY: f32 = 0.3;

/// Looping output: with more than `MIN_SENTENCES` sentences, fewer than
/// half distinct is a known upstream failure mode.
const MIN_SENTENCES: usize = 3;
const REPETITION_RATIO_FLOOR: f32 = 0.5;
const REPETITION_PENALTY: f32 = 0.2;

const VALID_CONFIDENCE_FLOOR: f32 = 0.5;
const MAX_FABRICATION_OCCURRENCES: usize = 2;

/// Outcome of validating one transcript. Ephemeral — recomputed on demand,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,

    /// 0.0 to 1.0, where 1.0 is highest confidence the text is real speech.
    pub confidence: f32,

    /// Human-readable findings, in check order. Diagnostics only.
    pub issues: Vec<String>,

    /// The transcript with every fabrication match stripped when invalid;
    /// the original text unchanged when valid.
    pub cleaned_transcript: String,
}

/// Pure transcript validator. Construction compiles the pattern library;
/// validation itself does no I/O and cannot fail.
pub struct TranscriptValidator {
    patterns: FabricationPatterns,
    sentence_boundary: Regex,
}

impl TranscriptValidator {
    pub fn new(patterns: FabricationPatterns) -> Self {
        Self {
            patterns,
            sentence_boundary: Regex::new(r"[.!?]\s+").expect("sentence boundary regex"),
        }
    }

    /// Validate a raw transcript against the reported audio duration.
    ///
    /// A `None` or non-positive duration skips the pacing and
    /// short-audio checks entirely.
    pub fn validate(&self, transcript: &str, duration_seconds: Option<f64>) -> ValidationResult {
        // Silence is a legitimate transcription outcome, not a failure.
        if transcript.trim().is_empty() {
            return ValidationResult {
                is_valid: true,
                confidence: 1.0,
                issues: Vec::new(),
                cleaned_transcript: String::new(),
            };
        }

        let mut issues = Vec::new();
        let mut confidence: f32 = 1.0;

        let mut fabrication_occurrences = 0usize;
        for pattern in self.patterns.iter() {
            let count = pattern.find_iter(transcript).count();
            if count > 0 {
                fabrication_occurrences += count;
                issues.push(format!(
                    "Fabricated phrase matched {}x: {}",
                    count,
                    pattern.as_str()
                ));
            }
        }
        if fabrication_occurrences > 0 {
            confidence -= fabrication_occurrences as f32 * FABRICATION_PENALTY;
            issues.push(format!(
                "Found {} fabricated phrase occurrence(s)",
                fabrication_occurrences
            ));
        }

        let word_count = transcript.split_whitespace().count();

        if let Some(duration) = duration_seconds.filter(|d| *d > 0.0) {
            let words_per_minute = word_count as f64 / duration * 60.0;
            if words_per_minute > MAX_WORDS_PER_MINUTE {
                confidence -= PACING_PENALTY;
                issues.push(format!(
                    "Unusually high speech rate: {} WPM (expected 120-180)",
                    words_per_minute.round()
                ));
            }

            if duration < SHORT_AUDIO_SECS && word_count > SHORT_AUDIO_MAX_WORDS {
                confidence -= SHORT_AUDIO_PENALTY;
                issues.push(format!(
                    "Short audio ({}s) with long transcript ({} words)",
                    duration, word_count
                ));
            }
        }

        let sentences: Vec<String> = self
            .sentence_boundary
            .split(transcript)
            .map(|s| s.trim().trim_end_matches(['.', '!', '?']).to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.len() > MIN_SENTENCES {
            let distinct: HashSet<&str> = sentences.iter().map(|s| s.as_str()).collect();
            let ratio = distinct.len() as f32 / sentences.len() as f32;
            if ratio < REPETITION_RATIO_FLOOR {
                confidence -= REPETITION_PENALTY;
                issues.push(format!(
                    "High repetition detected: {}% unique sentences",
                    (ratio * 100.0).round()
                ));
            }
        }

        let confidence = confidence.clamp(0.0, 1.0);
        let is_valid = confidence > VALID_CONFIDENCE_FLOOR
            && fabrication_occurrences < MAX_FABRICATION_OCCURRENCES;

        let cleaned_transcript = if is_valid {
            transcript.to_string()
        } else {
            self.strip_fabrications(transcript)
        };

        ValidationResult {
            is_valid,
            confidence,
            issues,
            cleaned_transcript,
        }
    }

    /// Remove every occurrence of every fabrication pattern and collapse
    /// the remaining whitespace.
    fn strip_fabrications(&self, transcript: &str) -> String {
        let mut cleaned = transcript.to_string();
        for pattern in self.patterns.iter() {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for TranscriptValidator {
    fn default() -> Self {
        Self::new(FabricationPatterns::default())
    }
}
