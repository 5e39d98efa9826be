//! Domain models for Tianji.
//!
//! - [`UserInput`]: birth date plus the [`Direction`] the reading should focus on.
//! - [`FortuneResult`]: the reading text and the zodiac label it was written for.
//! - [`Session`]: one user's interaction, an immutable state machine moving
//!   through [`LoadingState`]s. Sessions are never persisted.

mod fortune;
mod input;
mod session;

pub use fortune::*;
pub use input::*;
pub use session::*;
