use serde::{Serialize, Serializer};
use std::fmt;

/// The three linear stages of an onboarding session.
///
/// Steps are ordered so that `PhoneEntry < AccountSelection < QrReady`; a
/// session only ever moves forward through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    PhoneEntry,
    AccountSelection,
    QrReady,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::PhoneEntry, Step::AccountSelection, Step::QrReady];

    /// One-based position shown in the progress indicator.
    pub fn number(self) -> u8 {
        match self {
            Step::PhoneEntry => 1,
            Step::AccountSelection => 2,
            Step::QrReady => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::PhoneEntry => "Enter Phone Number",
            Step::AccountSelection => "Select Payment Methods",
            Step::QrReady => "Generated QR Code",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Step::QrReady
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

// Serialized as the step number so reports read "1", "2", "3".
impl Serialize for Step {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}
