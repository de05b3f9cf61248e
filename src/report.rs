//! JSON rendering of match records

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::game::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Tab-indented, one field per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Write `records` to `writer` as a JSON array followed by a newline
pub fn write_report<W: Write>(
    records: &ResultSet,
    mut writer: W,
    style: ReportStyle,
) -> io::Result<()> {
    match style {
        ReportStyle::Pretty => {
            let formatter = PrettyFormatter::with_indent(b"\t");
            let mut serializer = Serializer::with_formatter(&mut writer, formatter);
            records.serialize(&mut serializer).map_err(io::Error::from)?;
        }
        ReportStyle::Compact => {
            serde_json::to_writer(&mut writer, records).map_err(io::Error::from)?;
        }
    }
    writeln!(writer)?;
    writer.flush()
}

/// Create (or truncate) `path` and write the report into it
pub fn write_report_file(path: &Path, records: &ResultSet, style: ReportStyle) -> io::Result<()> {
    tracing::info!(path = %path.display(), records = records.len(), "writing report");
    let file = File::create(path)?;
    write_report(records, BufWriter::new(file), style)
}
