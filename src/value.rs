//! Helpers for assembling [`Value`] trees handed to templates.

use gtmpl::Value;
use std::collections::HashMap;

/// Builds a [`Value::Object`] from `(key, value)` pairs.
pub fn object<I>(fields: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    let m: HashMap<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect();
    Value::Object(m)
}

/// Inserts `(key, value)` pairs into `value` if it is an object; other values
/// are left untouched.
pub fn extend<I>(value: &mut Value, fields: I)
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    if let Value::Object(obj) = value {
        for (key, field) in fields {
            obj.insert(key.to_owned(), field);
        }
    }
}

pub fn string(s: &str) -> Value {
    Value::String(s.to_owned())
}

/// Missing header fields surface in templates as nil.
pub fn optional(opt: Option<&str>) -> Value {
    match opt {
        Some(s) => string(s),
        None => Value::Nil,
    }
}

pub fn number(n: usize) -> Value {
    Value::from(n as i64)
}

pub fn array<T, F>(items: &[T], f: F) -> Value
where
    F: Fn(&T) -> Value,
{
    Value::Array(items.iter().map(f).collect())
}
