use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::GenerationError;
use crate::model::{ORDER_COLUMNS, OrderLine};

/// Write order lines as CSV in the fixed output column order. Returns the
/// number of bytes written.
pub fn write_orders_csv(path: &Path, rows: &[OrderLine]) -> Result<u64, GenerationError> {
    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    // Explicit header so an empty run still yields a well-formed file.
    writer.write_record(ORDER_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
