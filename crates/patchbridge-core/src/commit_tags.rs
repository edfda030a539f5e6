//! Commit-message tag parsing.
//!
//! Modern `Relates-To: #N` / `Closes: #N` trailers win over legacy inline
//! `[#N]` tags; the legacy form is only consulted when no trailer matched.
//! A trailer counts only when a newline terminates its value.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TagValueError;

const RELATES_TO_PATTERN: &str = r"Relates-To: #([^\n]*)\n";
const CLOSES_PATTERN: &str = r"Closes: #([^\n]*)\n";
const LEGACY_TAG_PATTERN: &str = r"\[#([^\]\n]*)\]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Issue numbers referenced by a single commit message.
///
/// Absent keys are meaningful: `None` means the corresponding tag family was
/// not involved, `Some(vec![])` means it matched but no value parsed.
pub struct IssueReferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closes: Option<Vec<u64>>,
}

impl IssueReferences {
    pub fn is_empty(&self) -> bool {
        self.related.is_none() && self.closes.is_none()
    }

    pub fn related(&self) -> &[u64] {
        self.related.as_deref().unwrap_or_default()
    }

    pub fn closes(&self) -> &[u64] {
        self.closes.as_deref().unwrap_or_default()
    }

    /// Drop every `related` number that is also listed in `closes`.
    pub fn without_closed_duplicates(mut self) -> Self {
        if let (Some(related), Some(closes)) = (self.related.as_mut(), self.closes.as_ref()) {
            related.retain(|number| !closes.contains(number));
        }
        self
    }
}

/// Parse one captured tag value into an issue number.
pub fn parse_issue_value(raw: &str) -> Result<u64, TagValueError> {
    raw.trim().parse::<u64>().map_err(|_| TagValueError {
        value: raw.to_string(),
    })
}

pub fn parse_issue_number(commit_message: &str) -> IssueReferences {
    debug!(commit_message, "parsing commit message");
    let related = capture_values(relates_to_pattern(), commit_message);
    debug!(?related, "captured related issues");
    let closes = capture_values(closes_pattern(), commit_message);
    debug!(?closes, "captured closes issues");

    if !related.is_empty() || !closes.is_empty() {
        let references = IssueReferences {
            related: Some(construct_issue_list(&related)),
            // `closes` is only present when a `Closes:` tag matched.
            closes: (!closes.is_empty()).then(|| construct_issue_list(&closes)),
        };
        return references.without_closed_duplicates();
    }

    debug!("falling back to legacy tags");
    let legacy = capture_values(legacy_tag_pattern(), commit_message);
    debug!(?legacy, "captured legacy issues");
    if legacy.is_empty() {
        return IssueReferences::default();
    }
    IssueReferences {
        related: Some(construct_issue_list(&legacy)),
        closes: None,
    }
}

fn construct_issue_list(values: &[&str]) -> Vec<u64> {
    values
        .iter()
        .filter_map(|value| match parse_issue_value(value) {
            Ok(number) => Some(number),
            Err(error) => {
                warn!(%error, "dropping commit tag value");
                None
            }
        })
        .collect()
}

fn capture_values<'a>(pattern: &Regex, text: &'a str) -> Vec<&'a str> {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|value| value.as_str())
        .collect()
}

fn compile_static_pattern(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_) => unreachable!("static commit tag pattern"),
    }
}

fn relates_to_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile_static_pattern(RELATES_TO_PATTERN))
}

fn closes_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile_static_pattern(CLOSES_PATTERN))
}

fn legacy_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile_static_pattern(LEGACY_TAG_PATTERN))
}
