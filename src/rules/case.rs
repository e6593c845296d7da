//! Case conversion from hyphenated file stems to identifier candidates

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref HYPHEN_LOWER: Regex = Regex::new(r"-([a-z])").expect("hyphen pattern compiles");
}

/// `user-service` -> `userService`; only a hyphen followed by `a-z` is folded
pub fn to_camel_case(stem: &str) -> String {
    HYPHEN_LOWER
        .replace_all(stem, |caps: &Captures<'_>| caps[1].to_ascii_uppercase())
        .into_owned()
}

/// `user-service` -> `UserService`
pub fn to_pascal_case(stem: &str) -> String {
    let camel = to_camel_case(stem);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Identifiers accepted for a module stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseCandidates {
    pub stem: String,
    pub camel: String,
    pub pascal: String,
}

impl CaseCandidates {
    pub fn from_stem(stem: &str) -> Self {
        Self { stem: stem.to_string(), camel: to_camel_case(stem), pascal: to_pascal_case(stem) }
    }

    pub fn accepts(&self, name: &str) -> bool {
        name == self.stem || name == self.camel || name == self.pascal
    }

    /// Suggested name for a mismatching identifier, picked from the identifier's own casing.
    ///
    /// All-lowercase names get the camel form. Otherwise a name whose first
    /// character is unchanged by upper-casing (an uppercase letter, but also `_`,
    /// `$`, or a digit) gets the pascal form; anything else gets camel.
    pub fn expected_for(&self, name: &str) -> &str {
        if name == name.to_lowercase() {
            return &self.camel;
        }

        match name.chars().next() {
            Some(first) if first.to_uppercase().eq(std::iter::once(first)) => &self.pascal,
            _ => &self.camel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user-service", "userService")]
    #[case("calculate-total", "calculateTotal")]
    #[case("a-b-c", "aBC")]
    #[case("userService", "userService")]
    #[case("index", "index")]
    #[case("", "")]
    #[case("user-Service", "user-Service")]
    #[case("api-v2", "apiV2")]
    #[case("with-1-digit", "with-1Digit")]
    #[case("a--b", "a-B")]
    #[case("trailing-", "trailing-")]
    #[case("-leading", "Leading")]
    #[case("snake_case", "snake_case")]
    fn test_to_camel_case(#[case] stem: &str, #[case] expected: &str) {
        assert_eq!(to_camel_case(stem), expected);
    }

    #[rstest]
    #[case("user-service", "UserService")]
    #[case("config", "Config")]
    #[case("UserService", "UserService")]
    #[case("", "")]
    #[case("_private-thing", "_privateThing")]
    #[case("état-civil", "ÉtatCivil")]
    fn test_to_pascal_case(#[case] stem: &str, #[case] expected: &str) {
        assert_eq!(to_pascal_case(stem), expected);
    }

    #[test]
    fn test_candidates_accept_all_three_forms() {
        let candidates = CaseCandidates::from_stem("user-service");
        assert!(candidates.accepts("user-service"));
        assert!(candidates.accepts("userService"));
        assert!(candidates.accepts("UserService"));
        assert!(!candidates.accepts("userservice"));
        assert!(!candidates.accepts("User-service"));
    }

    #[rstest]
    #[case("wrongname", "userService")]
    #[case("wrongName", "userService")]
    #[case("WrongName", "UserService")]
    #[case("WRONG", "UserService")]
    #[case("_wrongName", "UserService")]
    #[case("$store", "userService")]
    #[case("$Store", "UserService")]
    fn test_expected_name_follows_identifier_casing(#[case] name: &str, #[case] expected: &str) {
        let candidates = CaseCandidates::from_stem("user-service");
        assert_eq!(candidates.expected_for(name), expected);
    }
}
