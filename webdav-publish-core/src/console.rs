use tracing::{error, info};

use crate::contract::Console;

/// [`Console`] that forwards operator messages to `tracing` under the `console` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl Console for TracingConsole {
    fn info(&self, message: &str) {
        info!(target: "console", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "console", "{message}");
    }
}
