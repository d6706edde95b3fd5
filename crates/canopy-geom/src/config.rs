use serde_json::{Map, Value};

/// Layout configuration as a loosely-typed JSON object.
///
/// Options structs across the workspace read their fields from dotted paths such as
/// `cluster.innerRadius` or `viewport.maxZoomIn`, falling back to their `Default` when a key is
/// missing or has the wrong type.
#[derive(Debug, Clone, PartialEq)]
pub struct Config(Value);

impl Default for Config {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl Config {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn get_usize(&self, dotted_path: &str) -> Option<usize> {
        self.get(dotted_path)?
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    /// Lays `other` over this config. Objects merge key by key; any other value replaces.
    pub fn overlay(&mut self, other: &Value) {
        overlay(&mut self.0, other);
    }
}

fn overlay(base: &mut Value, top: &Value) {
    let Value::Object(from) = top else {
        *base = top.clone();
        return;
    };
    if !base.is_object() {
        *base = Value::Object(Map::new());
    }
    if let Value::Object(into) = base {
        for (key, v) in from {
            overlay(into.entry(key.as_str()).or_insert(Value::Null), v);
        }
    }
}
