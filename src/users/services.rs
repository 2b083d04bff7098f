use lazy_static::lazy_static;
use regex::Regex;

/// Special characters the password policy accepts.
const SPECIAL_CHARS: &str = "!@#$%^&";

/// Password strength rules, checked in order; the first failure wins.
/// Pure: returns the rejection message or None.
pub fn validate_password(password: &str) -> Option<&'static str> {
    // Length bounds count characters, not bytes.
    let length = password.chars().count();
    if length < 8 {
        return Some("Password must be at least 8 characters");
    }
    if length > 72 {
        return Some("Password must be less than or equal to 72 characters");
    }
    if password.starts_with(' ') || password.ends_with(' ') {
        return Some("Password must not start or end with empty spaces");
    }
    if !is_complex(password) {
        return Some("Password must contain 1 upper case, lower case, number, and special character");
    }
    None
}

/// One of each character class, no whitespace anywhere.
fn is_complex(password: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut special = false;
    for c in password.chars() {
        if c.is_whitespace() {
            return false;
        }
        lower |= c.is_ascii_lowercase();
        upper |= c.is_ascii_uppercase();
        digit |= c.is_ascii_digit();
        special |= SPECIAL_CHARS.contains(c);
    }
    lower && upper && digit && special
}

pub fn validate_email(email: &str) -> Option<&'static str> {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").unwrap();
    }
    if !EMAIL_RE.is_match(email) {
        return Some("Email is invalid");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_passwords() {
        assert_eq!(
            validate_password("aB1!xyz"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(validate_password(""), Some("Password must be at least 8 characters"));
    }

    #[test]
    fn rejects_long_passwords() {
        let long = format!("aB1!{}", "x".repeat(69));
        assert_eq!(long.len(), 73);
        assert_eq!(
            validate_password(&long),
            Some("Password must be less than or equal to 72 characters")
        );
    }

    #[test]
    fn multibyte_passwords_count_characters_not_bytes() {
        // 7 characters but 8 bytes: still too short.
        let short = "äB1!xyz";
        assert_eq!(short.chars().count(), 7);
        assert_eq!(
            validate_password(short),
            Some("Password must be at least 8 characters")
        );

        // 72 characters but 73 bytes: still within the upper bound.
        let max = format!("äB1!{}", "x".repeat(68));
        assert_eq!(max.chars().count(), 72);
        assert_eq!(validate_password(&max), None);
    }

    #[test]
    fn accepts_boundary_lengths() {
        assert_eq!(validate_password("aB1!xyzw"), None); // exactly 8
        let max = format!("aB1!{}", "x".repeat(68));
        assert_eq!(max.len(), 72);
        assert_eq!(validate_password(&max), None);
    }

    #[test]
    fn rejects_leading_or_trailing_space() {
        assert_eq!(
            validate_password(" Password1!"),
            Some("Password must not start or end with empty spaces")
        );
        assert_eq!(
            validate_password("Password1! "),
            Some("Password must not start or end with empty spaces")
        );
    }

    #[test]
    fn rejects_missing_character_classes() {
        let msg = "Password must contain 1 upper case, lower case, number, and special character";
        assert_eq!(validate_password("password1!"), Some(msg)); // no upper
        assert_eq!(validate_password("PASSWORD1!"), Some(msg)); // no lower
        assert_eq!(validate_password("Password!!"), Some(msg)); // no digit
        assert_eq!(validate_password("Password11"), Some(msg)); // no special
        assert_eq!(validate_password("Pass word1!"), Some(msg)); // embedded space
    }

    #[test]
    fn short_beats_complexity() {
        // Rule order: length is reported before complexity.
        assert_eq!(
            validate_password("abc"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn accepts_compliant_passwords() {
        for p in ["Password1!", "aB3$efgh", "Tr4ck&Loop", "s3quencerAPP^"] {
            assert_eq!(validate_password(p), None, "password: {p}");
        }
    }

    #[test]
    fn accepts_reasonable_emails() {
        for e in [
            "u1@e.com",
            "test-user1@email.com",
            "first.last@sub.domain.org",
            "a_b@host.io",
        ] {
            assert_eq!(validate_email(e), None, "email: {e}");
        }
    }

    #[test]
    fn rejects_bad_emails() {
        for e in ["", "plain", "no-at.com", "user@", "@host.com", "user@host", "a b@host.com"] {
            assert_eq!(validate_email(e), Some("Email is invalid"), "email: {e}");
        }
    }
}
