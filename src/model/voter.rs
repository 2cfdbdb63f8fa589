use serde::{Deserialize, Serialize};

/// Eligibility record for a single voter identity.
/// A record only exists once the admin has registered the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub registered: bool,
    pub has_voted: bool,
}

impl Voter {
    /// A freshly registered voter who has not voted yet.
    pub fn registered() -> Self {
        Self {
            registered: true,
            has_voted: false,
        }
    }

    /// Can this voter still cast a vote?
    pub fn can_vote(&self) -> bool {
        self.registered && !self.has_voted
    }
}
