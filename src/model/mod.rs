pub mod address;
pub mod candidate;
pub mod event;
pub mod session;
pub mod voter;

pub use address::{Address, AddressError};
pub use candidate::{Candidate, CandidateId};
pub use event::{Event, EventKind};
pub use session::SessionState;
pub use voter::Voter;
