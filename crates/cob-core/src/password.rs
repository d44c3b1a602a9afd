//! Password-strength predicate.
//!
//! A strong password is at least 8 characters, contains a lowercase letter,
//! an uppercase letter, a digit, and one of `@$!%*?&`, and uses no other
//! characters. The `regex` crate has no lookahead, so the check is a direct
//! character scan with the same accept set.

const SPECIALS: &str = "@$!%*?&";

pub fn is_strong(password: &str) -> bool {
    if password.chars().count() < 8 {
        return false;
    }
    let mut has_lower = false;
    let mut has_upper = false;
    let mut has_digit = false;
    let mut has_special = false;
    for ch in password.chars() {
        match ch {
            'a'..='z' => has_lower = true,
            'A'..='Z' => has_upper = true,
            '0'..='9' => has_digit = true,
            _ if SPECIALS.contains(ch) => has_special = true,
            _ => return false,
        }
    }
    has_lower && has_upper && has_digit && has_special
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_complex_password() {
        assert!(is_strong("Str0ng!pass"));
    }

    #[test]
    fn rejects_missing_classes() {
        assert!(!is_strong("alllower1!"));
        assert!(!is_strong("ALLUPPER1!"));
        assert!(!is_strong("NoDigits!!"));
        assert!(!is_strong("NoSpecial1"));
    }

    #[test]
    fn rejects_short_and_foreign_characters() {
        assert!(!is_strong("Sh0rt!a"));
        assert!(!is_strong("Has Space1!"));
        assert!(!is_strong("Underscore_1A"));
    }
}
