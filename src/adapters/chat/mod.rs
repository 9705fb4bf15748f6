//! Chat channel adapters.

mod console;
mod recording;

pub use console::ConsoleChannel;
pub use recording::RecordingChannel;
