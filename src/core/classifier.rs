//! Build outcome classification
//!
//! Turns the captured text of one compiler run into a verdict by scraping
//! the error-count summary line. The scrape looks for the first integer that
//! is followed on the same line by the word `Error`, so it only understands
//! English compiler summaries such as `0 Error(s)`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Verdict for a single compiler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Error count found and zero
    Success,
    /// Error count non-zero, or not determinable (`None`)
    Failure { error_count: Option<u32> },
}

impl Verdict {
    /// Whether the build succeeded
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

fn error_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+).*?Error").expect("Invalid error count pattern"))
}

/// Classify captured compiler output
pub fn classify(output: &str) -> Verdict {
    let count = error_count_regex()
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    match count {
        Some(0) => Verdict::Success,
        Some(n) => Verdict::Failure {
            error_count: Some(n),
        },
        None => Verdict::Failure { error_count: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_errors_is_success() {
        assert_eq!(classify("0 Error(s)"), Verdict::Success);
    }

    #[test]
    fn test_error_count_is_failure() {
        assert_eq!(
            classify("3 Errors, see log"),
            Verdict::Failure {
                error_count: Some(3)
            }
        );
    }

    #[test]
    fn test_missing_count_is_unknown_failure() {
        assert_eq!(
            classify("Build started..."),
            Verdict::Failure { error_count: None }
        );
        assert_eq!(classify(""), Verdict::Failure { error_count: None });
    }

    #[test]
    fn test_count_and_label_must_share_a_line() {
        assert_eq!(
            classify("42 warnings\nError somewhere"),
            Verdict::Failure { error_count: None }
        );
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Build succeeded.\n    0 Warning(s)\n    0 Error(s)\n\n1 Error later";
        // "0 Warning(s)" has no Error on its line, so the summary line decides
        assert_eq!(classify(text), Verdict::Success);
    }

    #[test]
    fn test_label_is_case_sensitive() {
        assert_eq!(
            classify("5 errors"),
            Verdict::Failure { error_count: None }
        );
    }

    #[test]
    fn test_overflowing_count_is_unknown() {
        assert_eq!(
            classify("99999999999999999999 Error(s)"),
            Verdict::Failure { error_count: None }
        );
    }

    #[test]
    fn test_is_success() {
        assert!(Verdict::Success.is_success());
        assert!(!Verdict::Failure { error_count: Some(1) }.is_success());
    }
}
