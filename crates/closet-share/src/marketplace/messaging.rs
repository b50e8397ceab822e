//! Contact-detail redaction for renter/lender chat messages.
//!
//! Off-platform contact details are stripped before a message is stored so
//! bookings and payments stay on the marketplace.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("valid regex")
});
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    Email,
    Link,
    Phone,
}

impl PiiKind {
    fn placeholder(self) -> &'static str {
        match self {
            PiiKind::Email => "[email removed]",
            PiiKind::Link => "[link removed]",
            PiiKind::Phone => "[phone removed]",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            PiiKind::Email => &*EMAIL_RE,
            PiiKind::Link => &*LINK_RE,
            PiiKind::Phone => &*PHONE_RE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedMessage {
    pub text: String,
    /// One entry per replaced span.
    pub redactions: Vec<PiiKind>,
}

impl RedactedMessage {
    pub fn was_redacted(&self) -> bool {
        !self.redactions.is_empty()
    }
}

/// Replace e-mail addresses, links, and phone numbers with placeholders.
pub fn redact_pii(text: &str) -> RedactedMessage {
    let mut redacted = text.to_string();
    let mut redactions = Vec::new();

    // e-mails first so the link pattern never sees their domains
    for kind in [PiiKind::Email, PiiKind::Link, PiiKind::Phone] {
        let pattern = kind.pattern();
        let hits = pattern.find_iter(&redacted).count();
        if hits == 0 {
            continue;
        }
        redactions.extend(std::iter::repeat(kind).take(hits));
        redacted = pattern
            .replace_all(&redacted, kind.placeholder())
            .into_owned();
    }

    RedactedMessage {
        text: redacted,
        redactions,
    }
}
