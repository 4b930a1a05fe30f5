//! The `template` module turns a message into text.
//!
//! Two grammars live here: path masks (`/`-separated, `@token` placeholders)
//! used to name output files, and the richer format language used for
//! stream output and, in format-path mode, for file names.

pub mod encoding;
pub mod format;
pub mod mask;
pub mod time;
pub mod token;

pub use format::FormatExpander;
pub use mask::expand_mask;
pub use time::{Clock, FixedClock, PassTime, SystemClock, TimeSnapshot};
pub use token::{Token, resolve};
