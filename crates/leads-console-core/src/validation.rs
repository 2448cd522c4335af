//! Email format checks and identifier generation.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Returns `true` when `email` has a local part, an `@`, and a dotted
/// domain, with no whitespace anywhere.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Generate a probabilistically unique id.
///
/// The id is the current Unix time in milliseconds in base 36, followed by
/// ten random base-36 characters. Nothing checks for collisions.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut id = to_base36(millis);

    let random = Uuid::new_v4().as_u128();
    let suffix = to_base36((random % 36u128.pow(10)) as u64);
    id.push_str(&format!("{:0>10}", suffix));
    id
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("ana@acme.com"));
        assert!(validate_email("first.last+tag@mail.example.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!validate_email(""));
        assert!(!validate_email("ana"));
        assert!(!validate_email("ana@acme"));
        assert!(!validate_email("@acme.com"));
        assert!(!validate_email("ana silva@acme.com"));
        assert!(!validate_email("ana@@acme.com"));
        assert!(!validate_email("ana@acme.com "));
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert!(id.len() > 10);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_id_unlikely_to_collide() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
