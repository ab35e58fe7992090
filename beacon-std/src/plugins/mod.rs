//! Built-in plugins.

mod consent;
mod debug;

pub use consent::{ConsentPlugin, FlushCallback};
pub use debug::{DebugPlugin, summary_line, table, timestamp};
