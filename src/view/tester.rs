use crate::feed::error::FeedError;
use crate::feed::types::CheckResult;

pub const EMPTY_PROMPT_TEXT: &str = "Please enter a prompt to test.";
pub const REQUEST_FAILED_TEXT: &str = "Request failed. Check backend or network.";

/// What the prompt tester shows after a submit.
#[derive(Debug)]
pub enum CheckOutcome {
    Verdict(CheckResult),
    Rejected,
    Failed(FeedError),
}

impl CheckOutcome {
    pub fn from_result(result: Result<CheckResult, FeedError>) -> Self {
        match result {
            Ok(verdict) => CheckOutcome::Verdict(verdict),
            Err(FeedError::Validation(_)) => CheckOutcome::Rejected,
            Err(error) => CheckOutcome::Failed(error),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, CheckOutcome::Verdict(_))
    }

    pub fn render(&self) -> String {
        match self {
            CheckOutcome::Rejected => EMPTY_PROMPT_TEXT.to_string(),
            CheckOutcome::Failed(_) => REQUEST_FAILED_TEXT.to_string(),
            CheckOutcome::Verdict(verdict) => {
                let mut lines = vec![if verdict.allowed { "Allowed" } else { "Blocked" }.to_string()];
                if let Some(reason) = &verdict.reason {
                    lines.push(format!("Reason: {reason}"));
                }
                if let Some(details) = &verdict.details {
                    lines.push(serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string()));
                }
                lines.join("\n")
            }
        }
    }
}
