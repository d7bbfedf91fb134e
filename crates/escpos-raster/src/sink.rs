//! Write-only transport interface.
//!
//! The pipeline never performs I/O itself; callers hand the encoded command
//! to a [`RawSink`]. There is no read path: the device is never polled.

use std::io::{self, Write};

/// Destination for raw printer bytes.
pub trait RawSink {
    /// Write the whole buffer or fail.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// [`RawSink`] over any `std::io::Write` (device node, file, socket, buffer).
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RawSink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.inner.flush()
    }
}
