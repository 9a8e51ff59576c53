//! Contact identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a contact row, assigned by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactId(pub u64);

impl ContactId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contact:{}", self.0)
    }
}
