use crate::CheckRow;
use csv::{Terminator, WriterBuilder};
use policheck_types::Value;

pub const CSV_COLUMNS: [&str; 11] = [
    "row_id",
    "username",
    "policy_id",
    "description",
    "field",
    "operator",
    "value",
    "actual",
    "passed",
    "reason",
    "note",
];

/// Render rows as CSV with a header line and `\n` line endings.
///
/// Structured values are written as compact JSON, absent values as empty cells. Cells with
/// commas, quotes or newlines are quoted with inner quotes doubled.
pub fn render_csv(rows: &[CheckRow]) -> Result<String, csv::Error> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_COLUMNS)?;
    for row in rows {
        let value = cell(&row.value);
        let actual = cell(&row.actual);
        wtr.write_record([
            row.row_id.as_str(),
            row.username.as_str(),
            row.policy_id.as_str(),
            row.description.as_str(),
            row.field.as_str(),
            row.operator.as_str(),
            value.as_str(),
            actual.as_str(),
            if row.passed { "true" } else { "false" },
            row.reason.as_deref().unwrap_or(""),
            row.note.as_deref().unwrap_or(""),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(data).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.string_form(),
    }
}
