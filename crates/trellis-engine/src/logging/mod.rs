//! Logger initialization for binaries built on the engine.
//!
//! Library code logs through the `log` facade only. Tree edits log rejected
//! drops at `warn`/`error` and applied edits at `debug`.

mod init;

pub use init::{init_logging, LoggingConfig};
