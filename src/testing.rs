//! Fixtures shared by unit tests, mostly used through `#[registry_test]`.

use crate::model::Address;

/// Names used to seed candidates 1 to 4.
pub const CANDIDATE_NAMES: [&str; 4] = ["Chris Riches", "Parry Hotter", "Jane Doe", "John Doe"];

/// A fixed set of deterministic identities: one owner and six accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signers {
    pub owner: Address,
    pub acc1: Address,
    pub acc2: Address,
    pub acc3: Address,
    pub acc4: Address,
    pub acc5: Address,
    pub acc6: Address,
}

impl Signers {
    pub fn new() -> Self {
        Self {
            owner: Address::derive("owner"),
            acc1: Address::derive("acc1"),
            acc2: Address::derive("acc2"),
            acc3: Address::derive("acc3"),
            acc4: Address::derive("acc4"),
            acc5: Address::derive("acc5"),
            acc6: Address::derive("acc6"),
        }
    }

    /// Every non-owner account, in order.
    pub fn accounts(&self) -> [Address; 6] {
        [
            self.acc1, self.acc2, self.acc3, self.acc4, self.acc5, self.acc6,
        ]
    }
}
