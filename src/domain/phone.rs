//! Bangladesh mobile number validation.
//!
//! A number is accepted when it matches `01[3-9]` followed by eight ASCII
//! digits, optionally preceded by the `+88` or `88` country prefix.

use crate::error::{OnboardingError, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Inputs shorter than this are considered still being typed and are not validated.
pub const MIN_CHECKED_LENGTH: usize = 11;

pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid Bangladesh phone number";

static BD_MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+88|88)?01[3-9][0-9]{8}$").unwrap());

/// Returns `true` iff `raw` is a well-formed Bangladesh mobile number.
pub fn validate(raw: &str) -> bool {
    BD_MOBILE_RE.is_match(raw)
}

/// Outcome of checking the phone input as the user types it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneStatus {
    #[default]
    Incomplete,
    Valid,
    Invalid,
}

impl PhoneStatus {
    pub fn is_valid(self) -> bool {
        self == PhoneStatus::Valid
    }

    /// Inline message to show under the input, if any.
    pub fn error_message(self) -> Option<&'static str> {
        match self {
            PhoneStatus::Invalid => Some(INVALID_PHONE_MESSAGE),
            PhoneStatus::Incomplete | PhoneStatus::Valid => None,
        }
    }
}

/// Checks `raw`, skipping validation while it is shorter than [`MIN_CHECKED_LENGTH`].
///
/// Length is measured in UTF-16 code units, as text inputs report it.
pub fn check(raw: &str) -> PhoneStatus {
    if raw.encode_utf16().count() < MIN_CHECKED_LENGTH {
        PhoneStatus::Incomplete
    } else if validate(raw) {
        PhoneStatus::Valid
    } else {
        PhoneStatus::Invalid
    }
}

/// A phone number that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self> {
        if validate(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(OnboardingError::InvalidPhone)
        }
    }

    /// The number as entered, including any country prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 11-digit national form, starting with `01`.
    pub fn national(&self) -> &str {
        self.0
            .strip_prefix("+88")
            .or_else(|| self.0.strip_prefix("88"))
            .unwrap_or(&self.0)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = OnboardingError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_national_and_prefixed_forms() {
        assert!(validate("01712345678"));
        assert!(validate("+8801712345678"));
        assert!(validate("8801712345678"));
        assert!(validate("01312345678"));
        assert!(validate("01912345678"));
    }

    #[test]
    fn test_validate_rejects_malformed_input() {
        assert!(!validate(""));
        assert!(!validate("12345"));
        // Operator digit outside [3-9]
        assert!(!validate("01212345678"));
        assert!(!validate("01012345678"));
        // Too long / too short
        assert!(!validate("017123456789"));
        assert!(!validate("0171234567"));
        // Wrong or partial prefix
        assert!(!validate("+8701712345678"));
        assert!(!validate("+801712345678"));
        assert!(!validate("0171234567a"));
        assert!(!validate(" 01712345678"));
    }

    #[test]
    fn test_check_suppresses_short_input() {
        assert_eq!(check(""), PhoneStatus::Incomplete);
        assert_eq!(check("0171234"), PhoneStatus::Incomplete);
        assert_eq!(check("0171234").error_message(), None);
    }

    #[test]
    fn test_check_reports_invalid_once_long_enough() {
        let status = check("01212345678");
        assert_eq!(status, PhoneStatus::Invalid);
        assert_eq!(status.error_message(), Some(INVALID_PHONE_MESSAGE));

        // Long enough but still being typed with a prefix
        assert_eq!(check("+8801712345"), PhoneStatus::Invalid);
    }

    #[test]
    fn test_validate_rejects_non_ascii_digits() {
        // Bengali digits
        assert!(!validate("017১২৩৪৫৬৭৮"));
        assert!(!validate("০১৭১২৩৪৫৬৭৮"));
        // Full-width and Arabic-Indic digits
        assert!(!validate("017１２３４５６７８"));
        assert!(!validate("+88017٠١٢٣٤٥٦٧"));
        assert_eq!(check("017১২৩৪৫৬৭৮"), PhoneStatus::Invalid);
        assert!(PhoneNumber::parse("017১২৩৪৫৬৭৮").is_err());
    }

    #[test]
    fn test_check_counts_utf16_units() {
        // Nine digits plus one astral character make eleven UTF-16 units
        assert_eq!(check("017123456😀"), PhoneStatus::Invalid);
        assert_eq!(check("01712345😀"), PhoneStatus::Incomplete);
    }

    #[test]
    fn test_check_valid() {
        let status = check("+8801712345678");
        assert!(status.is_valid());
        assert_eq!(status.error_message(), None);
    }

    #[test]
    fn test_phone_number_national_form() {
        for raw in ["01712345678", "+8801712345678", "8801712345678"] {
            let phone = PhoneNumber::parse(raw).unwrap();
            assert_eq!(phone.national(), "01712345678");
            assert_eq!(phone.as_str(), raw);
        }
    }

    #[test]
    fn test_phone_number_parse_rejects_invalid() {
        assert!(matches!(
            PhoneNumber::try_from("01212345678"),
            Err(OnboardingError::InvalidPhone)
        ));
    }
}
