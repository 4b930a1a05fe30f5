//! The `output` module writes formatted messages to their destination:
//! standard output, or a file whose path is computed per message with its
//! directories created on demand.

pub mod dirs;
pub mod sink;

pub use dirs::ensure_dir;
pub use sink::OutputSink;
