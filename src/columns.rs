//! Column value decoding: raw JSON-encoded column payloads become plain
//! key/value pairs keyed by column title.
//!
//! Every raw value is parsed as JSON first; decoding then branches on the
//! column's declared type. Recognized types extract one field from the
//! parsed payload, everything else passes through unmodified. Emission is
//! gated on truthiness of both the parsed payload and the extracted field
//! (see [`is_truthy`]), so an unset phone column or a status at index `0`
//! simply omits its key rather than writing a placeholder.

use serde_json::{Map, Value};

use crate::types::{column_types, ColumnValue, ExtractError, FlatRecord, Item};

/// Flattens one item into a [`FlatRecord`] tagged with its group title.
pub fn flatten_item(item: Item, group: &str) -> Result<FlatRecord, ExtractError> {
    let fields = decode_columns(&item.column_values)?;
    Ok(FlatRecord {
        id: item.id,
        name: item.name,
        group: group.to_string(),
        fields,
    })
}

/// Decodes an item's columns into a field map.
///
/// The `type` key is written on every iteration, so after the loop it holds
/// the declared type of the last column. An item with no columns gets no
/// `type` key at all.
///
/// # Errors
///
/// [`ExtractError::Decode`] if any raw value is not valid JSON. There is no
/// per-column recovery; the first bad column fails the whole item.
pub fn decode_columns(columns: &[ColumnValue]) -> Result<Map<String, Value>, ExtractError> {
    let mut fields = Map::new();

    for column in columns {
        let parsed = parse_raw_value(column)?;
        let title = column.column.title.clone();

        match column.column_type.as_str() {
            column_types::BOARD_RELATION => {
                if let Some(ids) = gated_field(&parsed, "linkedPulseIds") {
                    if let Some(entries) = ids.as_array() {
                        fields.insert(title, Value::String(join_linked_ids(entries)));
                    }
                }
            }
            column_types::PHONE => insert_gated(&mut fields, title, &parsed, "phone"),
            column_types::EMAIL => insert_gated(&mut fields, title, &parsed, "email"),
            column_types::CREATION_LOG => insert_gated(&mut fields, title, &parsed, "created_at"),
            column_types::STATUS => insert_gated(&mut fields, title, &parsed, "index"),
            _ => {
                fields.insert(title, parsed);
            }
        }

        fields.insert(
            "type".to_string(),
            Value::String(column.column_type.clone()),
        );
    }

    Ok(fields)
}

/// Parses a column's raw value as JSON. An absent raw value decodes as
/// JSON `null`, matching how the source reports columns never set.
fn parse_raw_value(column: &ColumnValue) -> Result<Value, ExtractError> {
    match &column.value {
        Some(raw) => serde_json::from_str(raw).map_err(|e| ExtractError::Decode {
            column: column.column.title.clone(),
            message: e.to_string(),
        }),
        None => Ok(Value::Null),
    }
}

/// Inserts `parsed[key]` under `title` if both the payload and the field
/// are truthy; otherwise leaves the map untouched.
fn insert_gated(fields: &mut Map<String, Value>, title: String, parsed: &Value, key: &str) {
    if let Some(value) = gated_field(parsed, key) {
        fields.insert(title, value.clone());
    }
}

/// Returns `parsed[key]` when both `parsed` and the field pass the
/// truthiness gate.
fn gated_field<'a>(parsed: &'a Value, key: &str) -> Option<&'a Value> {
    if !is_truthy(parsed) {
        return None;
    }
    parsed.get(key).filter(|value| is_truthy(value))
}

/// JavaScript truthiness: `null`, `false`, `0`, and `""` are falsy; objects
/// and arrays, including empty ones, are truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Joins the `linkedPulseId` of each entry with `;`.
///
/// Entries missing the field contribute an empty segment.
fn join_linked_ids(entries: &[Value]) -> String {
    entries
        .iter()
        .map(|entry| entry.get("linkedPulseId").map(scalar_string).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(";")
}

/// Renders a scalar the way string concatenation would: numbers without
/// quoting, strings as-is, `null` as empty.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
