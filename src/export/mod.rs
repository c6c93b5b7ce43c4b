//! schema-checked export of change-log records
//!
//! converts validated log records to CSV (RFC 4180, column order checked
//! against the declared schema) and XML (structurally validated before
//! anything is written).

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::changelog::{ChangeKind, LogEntry};

/// declared CSV column schema, in order
pub const CSV_COLUMNS: [&str; 3] = ["timestamp", "file", "change"];

/// the header row a serialized record actually produces
///
/// the export refuses to write CSV whose header would disagree with the
/// declared schema, mirroring the column check on the consumer side.
pub fn record_columns() -> Result<Vec<String>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .serialize(LogEntry::new("probe", "probe", ChangeKind::Created))
        .context("failed to serialize probe record")?;
    writer.flush().context("failed to flush probe record")?;

    let buffer = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("failed to finish probe record")?;
    let data = String::from_utf8(buffer).context("probe record was not UTF-8")?;

    let header = data.lines().next().unwrap_or("");
    Ok(header.split(',').map(str::to_string).collect())
}

/// export records to CSV
pub fn export_csv(entries: &[LogEntry], path: &Path) -> Result<()> {
    let columns = record_columns()?;
    if columns != CSV_COLUMNS {
        return Err(anyhow!(
            "CSV schema mismatch: expected columns {:?}, record has {:?}",
            CSV_COLUMNS,
            columns
        ));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create export directory: {}", parent.display())
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create CSV file: {}", path.display()))?;

    writer
        .write_record(CSV_COLUMNS)
        .context("failed to write CSV header")?;
    for entry in entries {
        let change = entry.change.to_string();
        writer
            .write_record([
                entry.timestamp.as_str(),
                entry.file.as_str(),
                change.as_str(),
            ])
            .context("failed to write CSV record")?;
    }
    writer.flush().context("failed to flush CSV output")?;

    Ok(())
}

/// structural validation applied before any XML is written
///
/// the change kind is already constrained by the typed model; what remains
/// is that every element the schema requires has content.
pub fn validate_for_xml(entries: &[LogEntry]) -> Vec<String> {
    let mut errors = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        if entry.timestamp.trim().is_empty() {
            errors.push(format!("entry {}: empty timestamp", idx));
        }
        if entry.file.trim().is_empty() {
            errors.push(format!("entry {}: empty file name", idx));
        }
    }

    errors
}

/// export records to XML, refusing to write an invalid document
pub fn export_xml(entries: &[LogEntry], path: &Path) -> Result<()> {
    let errors = validate_for_xml(entries);
    if !errors.is_empty() {
        return Err(anyhow!(
            "XML validation failed:\n  {}",
            errors.join("\n  ")
        ));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create export directory: {}", parent.display())
            })?;
        }
    }

    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<LogData>\n");
    for entry in entries {
        doc.push_str("  <Entry>\n");
        doc.push_str(&format!(
            "    <timestamp>{}</timestamp>\n",
            escape_xml(&entry.timestamp)
        ));
        doc.push_str(&format!("    <file>{}</file>\n", escape_xml(&entry.file)));
        doc.push_str(&format!("    <change>{}</change>\n", entry.change));
        doc.push_str("  </Entry>\n");
    }
    doc.push_str("</LogData>\n");

    fs::write(path, doc)
        .with_context(|| format!("failed to write XML file: {}", path.display()))?;

    Ok(())
}

/// escape text content for XML
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
