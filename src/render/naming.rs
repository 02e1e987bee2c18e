//! Output file names derived from record values.

use crate::csv::Record;
use crate::error::{Error, Result};

/// Builds the output file stem of `record`.
///
/// The values of `fields` are joined with `separator` in the order the
/// fields were given. Without fields, the first column is used. Spaces
/// become underscores and the result is lowercased.
///
/// `render` checks the fields against the data file's header first, so a
/// field absent from the record only happens when called directly.
pub fn output_stem(record: &Record, fields: &[String], separator: &str) -> Result<String> {
    let stem = if fields.is_empty() {
        record.first_value().map(normalize).unwrap_or_default()
    } else {
        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let value = record.get(field).ok_or_else(|| Error::FieldNotInRecord {
                field: field.clone(),
                row: record.row,
            })?;
            parts.push(normalize(value));
        }
        parts.join(separator)
    };

    // A separator may itself contain a path separator.
    let stem = stem.replace(['/', '\\'], "_").to_lowercase();
    if stem.trim_matches(|c| c == '_' || c == '.').is_empty() {
        return Err(Error::EmptyName { row: record.row });
    }
    Ok(stem)
}

fn normalize(value: &str) -> String {
    value.trim().replace(' ', "_")
}
