use serde_json::json;

use super::error::FeedError;
use super::types::CheckResult;

/// Substrings that get a prompt blocked in simulated mode.
pub const DENY_LIST: &[&str] = &[
    "ssn",
    "social security",
    "credit card",
    "password",
    "explode",
    "bomb",
    "malware",
];

/// A prompt that passed caller-side validation: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInput(String);

impl PromptInput {
    pub fn parse(text: &str) -> Result<Self, FeedError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FeedError::Validation("prompt is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PromptInput {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Case-insensitive substring matcher. First pattern in list order wins.
#[derive(Debug, Clone)]
pub struct DenyList {
    patterns: Vec<String>,
}

impl Default for DenyList {
    fn default() -> Self {
        Self::new(DENY_LIST.iter().copied())
    }
}

impl DenyList {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn first_match(&self, prompt: &str) -> Option<&str> {
        let lowered = prompt.to_lowercase();
        self.patterns
            .iter()
            .find(|p| lowered.contains(p.as_str()))
            .map(String::as_str)
    }

    pub fn evaluate(&self, prompt: &str) -> CheckResult {
        match self.first_match(prompt) {
            Some(matched) => CheckResult::blocked(
                format!("Matched mock pattern: {matched}"),
                Some(json!({ "matched": matched })),
            ),
            None => CheckResult::allowed(),
        }
    }
}
