use serde::{Deserialize, Serialize};

/// A finished reading.
///
/// Held only for the lifetime of the session that requested it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FortuneResult {
    /// Provider text, or the fallback line when the provider returned none.
    pub content: String,
    /// Zodiac label for the birth year, e.g. `马`.
    pub zodiac: String,
}
