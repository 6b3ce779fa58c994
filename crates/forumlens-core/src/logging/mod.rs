//! Logging abstractions
//!
//! The client never logs through a global; a `Logger` is injected by the
//! composition root so embedders (CLI, tests, host applications) decide
//! where diagnostics go.

mod console;
mod noop;
mod traits;

pub use console::ConsoleLogger;
pub use noop::NoOpLogger;
pub use traits::{Logger, SharedLogger};
