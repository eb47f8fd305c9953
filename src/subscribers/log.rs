//! # LogWriter: line-per-event printer
//!
//! A minimal subscriber that prints every [`Event`] to stdout in the classic
//! simulation format `ACTOR ID [PEER ID]: message`.
//!
//! ## Example output
//! ```text
//! Teller 0 []: ready to serve for the first time
//! Bank []: opens
//! Customer 3 []: enters the bank
//! Teller 1 [Customer 3]: calls customer from line
//! Customer 3 [Teller 1]: introduces itself to teller
//! Teller 1 [Customer 3]: going to manager for withdrawal permission
//! Teller 1 [Customer 3]: completes withdrawal transaction
//! Customer 3 [Teller 1]: leaves the bank
//! Bank []: closes
//! ```

use std::io::Write;

use crate::events::Event;
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", e.line());
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }

    fn queue_capacity(&self) -> usize {
        4096
    }
}
