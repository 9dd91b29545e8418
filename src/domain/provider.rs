use serde::{Deserialize, Serialize};

/// A payment channel (mobile wallet or bank) and the accounts it exposes
/// for the verified phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    /// Short display glyph shown next to the name.
    pub icon: String,
    pub accounts: Vec<String>,
}

impl Provider {
    pub fn new<I, S>(name: &str, icon: &str, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            accounts: accounts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_account(&self, account: &str) -> bool {
        self.accounts.iter().any(|a| a == account)
    }
}

/// Looks up whether `(provider, account)` is offered by any provider in `providers`.
pub fn offers(providers: &[Provider], provider: &str, account: &str) -> bool {
    providers
        .iter()
        .any(|p| p.name == provider && p.has_account(account))
}
