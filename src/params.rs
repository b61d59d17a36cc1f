//! Filter parameter dictionaries.
//!
//! A small model of the PDF dictionary that travels alongside a filtered
//! stream. The filter never interprets caller-supplied entries; it copies them
//! and may add its own.

use std::collections::BTreeMap;
use std::fmt;

/// A value stored in a [`Parameters`] dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// A PDF name such as `/DeviceRGB`, stored without the leading slash.
    Name(String),
    String(Vec<u8>),
    Array(Vec<Value>),
    Dictionary(Parameters),
    Null,
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Parameters> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<Parameters> for Value {
    fn from(v: Parameters) -> Self {
        Value::Dictionary(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Name(n) => write!(f, "/{n}"),
            Value::String(s) => write!(f, "({})", String::from_utf8_lossy(s)),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Dictionary(d) => write!(f, "{d}"),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Name-keyed parameter dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: BTreeMap<String, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_integer)
    }

    pub fn get_name(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_name)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn set_name(&mut self, key: impl Into<String>, name: impl Into<String>) -> Option<Value> {
        self.set(key, Value::Name(name.into()))
    }

    /// Sets `key` only if it is not present. Returns true when the value was stored.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        use std::collections::btree_map::Entry;
        match self.entries.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Copies every entry of `other` into `self`, overwriting equal keys.
    pub fn add_all(&mut self, other: &Parameters) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// True if every entry of `other` is present here with an equal value.
    pub fn is_superset_of(&self, other: &Parameters) -> bool {
        other
            .entries
            .iter()
            .all(|(k, v)| self.entries.get(k) == Some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<<")?;
        for (k, v) in &self.entries {
            write!(f, " /{k} {v}")?;
        }
        write!(f, " >>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_if_absent_keeps_existing() {
        let mut params = Parameters::new();
        params.set("Width", 10i64);
        assert!(!params.set_if_absent("Width", 20i64));
        assert!(params.set_if_absent("Height", 5i64));
        assert_eq!(params.get_int("Width"), Some(10));
        assert_eq!(params.get_int("Height"), Some(5));
    }

    #[test]
    fn test_add_all_and_superset() {
        let input: Parameters = [("Width", Value::from(4i64)), ("Foo", Value::Boolean(true))]
            .into_iter()
            .collect();
        let mut merged = Parameters::new();
        merged.add_all(&input);
        merged.set_name("ColorSpace", "DeviceRGB");

        assert!(merged.is_superset_of(&input));
        assert!(!input.is_superset_of(&merged));
        assert_eq!(merged.get_name("ColorSpace"), Some("DeviceRGB"));
    }

    #[test]
    fn test_display() {
        let mut params = Parameters::new();
        params.set("BitsPerComponent", 8i64);
        params.set_name("ColorSpace", "DeviceGray");
        assert_eq!(
            params.to_string(),
            "<< /BitsPerComponent 8 /ColorSpace /DeviceGray >>"
        );
    }
}
