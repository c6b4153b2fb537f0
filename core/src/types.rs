//! Domain DTOs served by the example API.

use serde::{Deserialize, Serialize};

/// A single record as found in the `object` and `array` payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
}
