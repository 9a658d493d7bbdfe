//! Opportunistic contact extraction from raw message text.
//!
//! Heuristic and single-pass: the first email-shaped substring wins, on
//! the assumption that a chat message contains at most one contact offer.
//! The display-name candidate is whatever remains of the message once the
//! email is removed, when it is short enough to plausibly be a name.

use std::sync::LazyLock;

use regex::Regex;

/// First-match email pattern: word/punctuation local part, dot-separated
/// domain labels, TLD of at least 2 letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

/// Stricter whole-string shape used to validate explicit submissions.
static STRICT_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Remainders at or above this many characters are not plausible names.
const MAX_NAME_CHARS: usize = 50;

/// Contact details pulled out of a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedContact {
    /// The matched email address.
    pub email: String,
    /// Plausible display name, or empty when none was found.
    pub name: String,
}

/// Scan a message for an embedded email address and a plausible name.
///
/// Returns `None` when no email-shaped substring is present. When the
/// email spans the entire message the name is empty, not an error.
#[must_use]
pub fn extract(text: &str) -> Option<ExtractedContact> {
    let matched = EMAIL_RE.find(text)?;
    let email = matched.as_str().to_owned();

    let remainder = format!("{}{}", &text[..matched.start()], &text[matched.end()..]);
    let candidate = remainder.trim();
    let name = if !candidate.is_empty() && candidate.chars().count() < MAX_NAME_CHARS {
        candidate.to_owned()
    } else {
        String::new()
    };

    Some(ExtractedContact { email, name })
}

/// Validate an explicitly submitted email address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    STRICT_EMAIL_RE.is_match(email)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_email_has_empty_name() {
        let contact = extract("john@example.com").unwrap();
        assert_eq!(contact.email, "john@example.com");
        assert_eq!(contact.name, "");
    }

    #[test]
    fn name_is_trimmed_remainder() {
        let contact = extract("I'm Jane Doe, jane.doe@corp.co").unwrap();
        assert_eq!(contact.email, "jane.doe@corp.co");
        assert_eq!(contact.name, "I'm Jane Doe,");
    }

    #[test]
    fn no_email_yields_none() {
        assert!(extract("no email here").is_none());
    }

    #[test]
    fn first_match_wins() {
        let contact = extract("a@b.co or c@d.io").unwrap();
        assert_eq!(contact.email, "a@b.co");
    }

    #[test]
    fn long_remainder_is_not_a_name() {
        let padding = "x".repeat(60);
        let contact = extract(&format!("{padding} jane@corp.co")).unwrap();
        assert_eq!(contact.email, "jane@corp.co");
        assert_eq!(contact.name, "");
    }

    #[test]
    fn remainder_just_under_the_limit_is_accepted() {
        let name = "y".repeat(49);
        let contact = extract(&format!("{name} jane@corp.co")).unwrap();
        assert_eq!(contact.name, name);
    }

    #[test]
    fn email_in_the_middle_joins_both_sides() {
        let contact = extract("reach me at jane@corp.co thanks").unwrap();
        assert_eq!(contact.name, "reach me at  thanks");
    }

    #[test]
    fn plus_and_percent_in_local_part() {
        let contact = extract("bob+tag%x@mail.example.org").unwrap();
        assert_eq!(contact.email, "bob+tag%x@mail.example.org");
    }

    #[test]
    fn single_letter_tld_does_not_match() {
        assert!(extract("weird@host.x").is_none());
    }

    #[test]
    fn strict_validation_accepts_normal_addresses() {
        assert!(is_valid_email("jane@corp.co"));
        assert!(is_valid_email("a.b+c@sub.domain.io"));
    }

    #[test]
    fn strict_validation_rejects_malformed() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two words@x.io"));
        assert!(!is_valid_email("no@tld"));
        assert!(!is_valid_email("a@b@c.io"));
    }
}
