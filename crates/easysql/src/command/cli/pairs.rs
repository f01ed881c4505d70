//! Parsers for `column=value` and `column[:direction]` command line arguments.

use easysql_database::{Direction, Value};

/// Parse a `column=value` argument.
///
/// The value is typed with [`parse_value`]; everything after the first `=` belongs to it.
pub fn parse_pair(raw: &str) -> Result<(String, Value), String> {
    let Some((column, value)) = raw.split_once('=') else {
        return Err(format!("expected column=value, got `{raw}`"));
    };
    if column.trim().is_empty() {
        return Err(format!("missing column name in `{raw}`"));
    }
    Ok((column.trim().to_string(), parse_value(value)))
}

/// Type a command line value: `null`, `true`/`false`, integers and finite reals are typed,
/// anything else is text. Wrap a value in single quotes to force text, e.g. `'42'`.
pub fn parse_value(raw: &str) -> Value {
    if let Some(text) = raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Value::from(text);
    }
    match raw {
        "null" | "NULL" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(int) = raw.parse::<i64>() {
                Value::Integer(int)
            } else if let Some(real) = raw.parse::<f64>().ok().filter(|real| real.is_finite()) {
                Value::Real(real)
            } else {
                Value::from(raw)
            }
        }
    }
}

/// Parse a `column` or `column:asc|desc` sort key.
pub fn parse_order(raw: &str) -> Result<(String, Direction), String> {
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => (
            column,
            direction.parse::<Direction>().map_err(|err| err.to_string())?,
        ),
        None => (raw, Direction::Asc),
    };
    if column.trim().is_empty() {
        return Err(format!("missing column name in `{raw}`"));
    }
    Ok((column.trim().to_string(), direction))
}
