use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, warn};

use crate::api::{Call, Response};
use crate::error::Result;
use crate::model::Address;

/// A unique identifier for a particular submitted call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct CallId(pub usize);

impl Display for CallId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl CallId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> CallId {
        static CALL_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        CallId(CALL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Log an incoming call.
pub fn log_call(id: CallId, caller: Address, call: &Call) {
    info!("->call{id} {caller} {call}");
}

/// Log the outcome of a call. Rejections are warnings.
pub fn log_outcome(id: CallId, outcome: &Result<Response>) {
    match outcome {
        Ok(response) => info!("<-ret{id} {response}"),
        Err(err) => warn!("<-ret{id} rejected: {err}"),
    }
}
