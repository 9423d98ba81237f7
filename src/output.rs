// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Herd Market Simulation Suite - Result Sink

use std::io::{self, Write};

/// Writes one series as a single CSV row: every field quoted, comma
/// separated, newline terminated. Values use the shortest representation
/// that reads back to the same `f64`.
pub fn write_csv_row<W: Write + ?Sized>(writer: &mut W, series: &[f64]) -> io::Result<()> {
    let mut first = true;
    for value in series {
        if !first {
            writer.write_all(b",")?;
        }
        write!(writer, "\"{}\"", value)?;
        first = false;
    }
    writer.write_all(b"\n")
}

/// One row per series, in order.
pub fn write_csv_rows<W, S>(writer: &mut W, rows: &[S]) -> io::Result<()>
where
    W: Write + ?Sized,
    S: AsRef<[f64]>,
{
    for row in rows {
        write_csv_row(writer, row.as_ref())?;
    }
    Ok(())
}
