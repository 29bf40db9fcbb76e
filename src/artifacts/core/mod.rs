//! Shared utilities
//!
//! Adapter types that don't belong to any one storage area.

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// `Write` adapter over the minus pager
///
/// Commands write through a `Box<dyn Write>`; this adapter lets the log
/// command target the pager with the same plumbing it uses for stdout.
/// Output accumulates in the pager and is shown in one static pass via
/// [`PagerWriter::show`] once the command finishes.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    /// Display everything pushed so far, blocking until the pager exits
    pub fn show(pager: Pager) -> io::Result<()> {
        minus::page_all(pager).map_err(io::Error::other)
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // pager input is text; the log command never writes raw bytes
        let text = String::from_utf8_lossy(buf);
        self.pager.push_str(text).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
