//! Terminal alert and notification adapters.
//!
//! Two user-visible channels, matching the original split: the alert banner
//! with an audio cue (always on) and the permission-gated notification line.

pub mod alert;
pub mod terminal;

pub use alert::TerminalAlertSink;
pub use terminal::TerminalNotifier;
