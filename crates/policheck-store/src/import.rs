//! Bulk import parsing: JSON or CSV text into policies and user records.
//!
//! Parsing is strict about shape and lenient about content. A record that cannot be read
//! aborts the whole file; a cell that does not fit its inferred column type keeps its text.

use crate::error::StoreError;
use camino::Utf8Path;
use csv::StringRecord;
use policheck_domain::{coerce, parse_number};
use policheck_types::{Operator, Policy, UserRecord, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// How many non-empty cells of a user CSV column are sampled to pick its type.
pub const INFER_SAMPLE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Utf8Path) -> Result<Self, StoreError> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Ok(Format::Json),
            Some("csv") => Ok(Format::Csv),
            _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

/// Inferred type of a user CSV column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Bool,
    Text,
}

pub fn read_policies(path: &Utf8Path) -> Result<Vec<Policy>, StoreError> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let policies = parse_policies(&text, format)?;
    tracing::debug!(%path, format = format.as_str(), count = policies.len(), "parsed policies");
    Ok(policies)
}

pub fn read_users(path: &Utf8Path) -> Result<Vec<UserRecord>, StoreError> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let users = parse_users(&text, format)?;
    tracing::debug!(%path, format = format.as_str(), count = users.len(), "parsed users");
    Ok(users)
}

pub fn parse_policies(text: &str, format: Format) -> Result<Vec<Policy>, StoreError> {
    match format {
        Format::Json => policies_from_json(text),
        Format::Csv => policies_from_csv(text),
    }
}

pub fn parse_users(text: &str, format: Format) -> Result<Vec<UserRecord>, StoreError> {
    match format {
        Format::Json => users_from_json(text),
        Format::Csv => users_from_csv(text),
    }
}

// ---------- Policies ----------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyRow {
    #[serde(default, alias = "id")]
    policy_id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    field: String,
    #[serde(default)]
    operator: String,
    #[serde(default)]
    value: Value,
}

impl PolicyRow {
    fn into_policy(self) -> Policy {
        let operator = Operator::parse(self.operator.trim());
        // text operands get the same treatment as the authoring form
        let value = match self.value {
            Value::String(raw) => coerce(&raw, &operator),
            other => other,
        };
        Policy {
            policy_id: self.policy_id,
            description: self.description,
            field: self.field,
            operator,
            value,
        }
    }
}

/// A JSON document holding either one object or an array of them.
fn json_items(text: &str) -> Result<Vec<JsonValue>, StoreError> {
    match serde_json::from_str::<JsonValue>(text)? {
        JsonValue::Array(items) => Ok(items),
        obj @ JsonValue::Object(_) => Ok(vec![obj]),
        other => Err(StoreError::invalid(
            0,
            format!("expected an object or an array of objects, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn policies_from_json(text: &str) -> Result<Vec<Policy>, StoreError> {
    json_items(text)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(StoreError::invalid(
                    index,
                    format!("policy must be a JSON object, got {}", json_kind(&item)),
                ));
            }
            serde_json::from_value::<PolicyRow>(item)
                .map(PolicyRow::into_policy)
                .map_err(|e| StoreError::invalid(index, e.to_string()))
        })
        .collect()
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

fn policies_from_csv(text: &str) -> Result<Vec<Policy>, StoreError> {
    let mut rdr = csv_reader(text);
    let headers = rdr.headers()?.clone();
    let id_col = column(&headers, &["policy_id"]).or_else(|| column(&headers, &["id"]));
    let description_col = column(&headers, &["description"]);
    let field_col = column(&headers, &["field"]);
    let operator_col = column(&headers, &["operator"]);
    let value_col = column(&headers, &["value"]);

    let cell = |record: &StringRecord, col: Option<usize>| -> String {
        col.and_then(|i| record.get(i)).unwrap_or("").to_string()
    };

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let operator = Operator::parse(&cell(&record, operator_col));
        let value = coerce(&cell(&record, value_col), &operator);
        out.push(Policy {
            policy_id: cell(&record, id_col),
            description: cell(&record, description_col),
            field: cell(&record, field_col),
            operator,
            value,
        });
    }
    Ok(out)
}

// ---------- Users ----------

fn users_from_json(text: &str) -> Result<Vec<UserRecord>, StoreError> {
    json_items(text)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| user_from_json(index, item))
        .collect()
}

fn user_from_json(index: usize, item: JsonValue) -> Result<UserRecord, StoreError> {
    let JsonValue::Object(mut map) = item else {
        return Err(StoreError::invalid(
            index,
            format!("user must be a JSON object, got {}", json_kind(&item)),
        ));
    };

    let username = match map.remove("username") {
        Some(JsonValue::String(s)) => s,
        Some(JsonValue::Number(n)) => Value::from(JsonValue::Number(n)).string_form(),
        Some(other) => {
            return Err(StoreError::invalid(
                index,
                format!("username must be a string, got {}", json_kind(&other)),
            ));
        }
        None => return Err(StoreError::MissingUsername),
    };

    Ok(UserRecord {
        username,
        attributes: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
    })
}

fn users_from_csv(text: &str) -> Result<Vec<UserRecord>, StoreError> {
    let mut rdr = csv_reader(text);
    let headers = rdr.headers()?.clone();
    let username_col = column(&headers, &["username"]).ok_or(StoreError::MissingUsername)?;

    let rows: Vec<StringRecord> = rdr.records().collect::<Result<_, _>>()?;
    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| infer_column_kind(rows.iter().filter_map(|r| r.get(col))))
        .collect();
    tracing::debug!(
        columns = ?headers.iter().zip(&kinds).collect::<Vec<_>>(),
        "inferred user column kinds"
    );

    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        let username = row.get(username_col).unwrap_or("").to_string();
        let mut user = UserRecord::new(username);
        for (col, name) in headers.iter().enumerate() {
            if col == username_col {
                continue;
            }
            let Some(cell) = row.get(col).filter(|c| !c.is_empty()) else {
                continue;
            };
            user.attributes
                .insert(name.to_string(), convert_cell(cell, kinds[col]));
        }
        out.push(user);
    }
    Ok(out)
}

/// Pick a column type from up to [`INFER_SAMPLE`] non-empty cells.
///
/// Numbers win over booleans, so a `0`/`1` column is numeric. A column with no samples is text.
pub fn infer_column_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let sample: Vec<&str> = cells
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .take(INFER_SAMPLE)
        .collect();
    if sample.is_empty() {
        return ColumnKind::Text;
    }
    if sample.iter().all(|c| parse_number(c).is_some()) {
        return ColumnKind::Number;
    }
    if sample.iter().all(|c| parse_bool(c).is_some()) {
        return ColumnKind::Bool;
    }
    ColumnKind::Text
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

fn convert_cell(cell: &str, kind: ColumnKind) -> Value {
    let converted = match kind {
        ColumnKind::Number => parse_number(cell).map(Value::Number),
        ColumnKind::Bool => parse_bool(cell).map(Value::Bool),
        ColumnKind::Text => None,
    };
    converted.unwrap_or_else(|| Value::String(cell.to_string()))
}
