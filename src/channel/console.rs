//! Dry-run channel writing units to a terminal instead of sending them.

use std::io::Write;

use async_trait::async_trait;
use tracing::error;

use crate::channel::{Channel, DeliveryReport};
use crate::render::{RenderedUnit, GREETING};
use crate::Result;

/// Prints every unit, one block per unit.
pub struct ConsoleChannel<W> {
    out: W,
}

impl ConsoleChannel<std::io::Stdout> {
    /// Console channel on standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleChannel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the channel, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> Channel for ConsoleChannel<W> {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn begin(&mut self) -> Result<()> {
        writeln!(self.out, "{GREETING}\n")?;
        Ok(())
    }

    async fn deliver(&mut self, category: &str, units: &[RenderedUnit]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for unit in units {
            match writeln!(self.out, "[{category}] {}\n", unit.text) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    error!(category, "Failed to write unit: {}", e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    async fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
