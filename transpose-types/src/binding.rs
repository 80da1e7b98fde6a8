use serde::{Deserialize, Serialize};

/// A captured key: the printable key name plus the native key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    #[serde(rename = "keyCode")]
    pub key_code: u64,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, key_code: u64) -> Self {
        Self { key: key.into(), key_code }
    }
}

/// A named association between an application action and a captured key.
///
/// `key` and `key_code` are either both set or both `None`; use
/// [`Binding::assign`] and [`Binding::clear`] rather than writing them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub name: String,
    pub purpose: String,
    pub key: Option<String>,
    pub key_code: Option<u64>,
    pub required: bool,
}

impl Binding {
    /// An unbound binding.
    pub fn new(name: impl Into<String>, purpose: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            key: None,
            key_code: None,
            required,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.key.is_some()
    }

    pub fn value(&self) -> Option<KeyValue> {
        match (&self.key, self.key_code) {
            (Some(key), Some(key_code)) => Some(KeyValue::new(key.clone(), key_code)),
            _ => None,
        }
    }

    pub fn assign(&mut self, value: KeyValue) {
        self.key = Some(value.key);
        self.key_code = Some(value.key_code);
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.key_code = None;
    }

    /// Whether this binding holds exactly `key`.
    pub fn holds(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}
