use std::fmt::Display;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// States of the voting session.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum SessionState {
    /// Votes are rejected. This is the initial state, and the state after voting ends.
    #[default]
    Inactive = 0,
    /// Votes are accepted.
    Active = 1,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl Display for SessionState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Inactive => "inactive",
                Self::Active => "active",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&SessionState::Inactive).unwrap(), "0");
        assert_eq!(serde_json::to_string(&SessionState::Active).unwrap(), "1");
        let state: SessionState = serde_json::from_str("1").unwrap();
        assert_eq!(state, SessionState::Active);
        serde_json::from_str::<SessionState>("2").unwrap_err();
    }
}
