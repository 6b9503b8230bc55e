//! Domain and email syntax validation
//!
//! Pure functions gating the webhook's input before any work is dispatched.
//! Both checks are syntax-only: a dotted quad with out-of-range octets such
//! as `999.999.1.1` passes, since the delegate script resolves the value
//! itself and rejects anything unusable.

use regex::Regex;
use std::sync::LazyLock;

/// Dotted-quad IPv4 literal: four 1-3 digit groups
static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("static pattern"));

/// Hostname grammar: labels of 1-63 alphanumeric characters with internal
/// hyphens only, joined by single dots
static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("static pattern")
});

/// `local-part@domain-part` with a 2+ letter TLD
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static pattern")
});

/// Check whether `domain` is a syntactically valid target for a domain
/// change: either an IPv4 literal or a hostname.
pub fn validate_domain(domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    IPV4_RE.is_match(domain) || HOSTNAME_RE.is_match(domain)
}

/// Check whether `email` is a syntactically valid email address.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
