//! Named key bindings with uniqueness, restricted-key and required rules.

use transpose_types::{Binding, KeyValue};

use super::persistence::record::{self, KeybindRecord};
use super::persistence::ConfigStore;

/// Single-character keys reserved for other application use.
pub const RESTRICTED_KEYS: &str =
    "1!2@34$5%6^78*9(0)qwertyuiopQWERTYUIOPasdfghjklASDFGHJKLzxcvbnmZXCVBNM";

/// The optional binding that gates scroll adjustments.
pub const SCROLL_BINDING: &str = "scroll_down";

/// Built-in binding set, in display order.
pub fn default_bindings() -> Vec<Binding> {
    vec![
        Binding::new("pause", "Pause All Binds", true),
        Binding::new("transpose_up", "Transpose Up", true),
        Binding::new("transpose_down", "Transpose Down", true),
        Binding::new("next_transpose", "Next Transpose", true),
        Binding::new("previous_transpose", "Previous Transpose", true),
        Binding::new(SCROLL_BINDING, "Scroll Down", false),
    ]
}

/// Keys are compared whole, so `F1` or `Shift` are never restricted.
pub fn is_restricted(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => RESTRICTED_KEYS.contains(c),
        _ => false,
    }
}

/// Classification of a bind request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// Key is reserved; nothing changed.
    Restricted,
    /// No binding with that name.
    Unknown,
    /// Optional binding requested before every required one is set.
    Locked,
    /// The named binding already holds this key.
    Unchanged,
    /// Key accepted. `stolen_from` names the binding that lost it.
    Bound { stolen_from: Option<String> },
}

pub struct BindingStore {
    bindings: Vec<Binding>,
    config_name: String,
    storage: Box<dyn ConfigStore>,
}

impl BindingStore {
    /// Build from the stored record for `config_name`, or the defaults.
    ///
    /// Never fails: unreadable, malformed or too-new records are logged and
    /// replaced by the built-in set.
    pub fn load(storage: Box<dyn ConfigStore>, config_name: &str) -> Self {
        let defaults = default_bindings();
        let bindings = match storage.load(config_name) {
            Ok(Some(json)) => match KeybindRecord::decode(&json) {
                Ok(rec) => record::merge(&defaults, rec, is_restricted),
                Err(e) => {
                    log::warn!(target: "persistence", "keybinds '{}' unusable, using defaults: {}", config_name, e);
                    defaults
                }
            },
            Ok(None) => {
                log::info!(target: "persistence", "no keybinds stored for '{}', using defaults", config_name);
                defaults
            }
            Err(e) => {
                log::warn!(target: "persistence", "could not read keybinds '{}': {}", config_name, e);
                defaults
            }
        };

        Self {
            bindings,
            config_name: config_name.to_string(),
            storage,
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// True iff every required binding holds a key.
    pub fn can_operate(&self) -> bool {
        self.bindings.iter().filter(|b| b.required).all(|b| b.is_bound())
    }

    /// Required bindings are always capturable; optional ones only once operable.
    pub fn is_capturable(&self, name: &str) -> bool {
        match self.get(name) {
            Some(b) => b.required || self.can_operate(),
            None => false,
        }
    }

    /// Bindings a capture UI should offer right now.
    pub fn capturable_bindings(&self) -> Vec<&Binding> {
        let operable = self.can_operate();
        self.bindings.iter().filter(|b| b.required || operable).collect()
    }

    /// Classify and apply a bind request, persisting on every change.
    pub fn validate_and_bind(&mut self, name: &str, value: KeyValue) -> BindOutcome {
        if is_restricted(&value.key) {
            return BindOutcome::Restricted;
        }
        let Some(target) = self.bindings.iter().position(|b| b.name == name) else {
            return BindOutcome::Unknown;
        };
        if !self.is_capturable(name) {
            return BindOutcome::Locked;
        }

        let holder = self.bindings.iter().position(|b| b.holds(&value.key));
        if holder == Some(target) && self.bindings[target].key_code == Some(value.key_code) {
            return BindOutcome::Unchanged;
        }

        let stolen_from = match holder {
            Some(i) if i != target => {
                self.bindings[i].clear();
                Some(self.bindings[i].name.clone())
            }
            _ => None,
        };
        self.bindings[target].assign(value);
        self.persist();
        BindOutcome::Bound { stolen_from }
    }

    /// Write the full set. Failures are logged; memory stays authoritative.
    pub fn persist(&mut self) {
        let is_default = self.config_name == super::DEFAULT_CONFIG_NAME;
        let result = KeybindRecord::from_bindings(&self.bindings)
            .encode()
            .and_then(|json| self.storage.save(&self.config_name, &json, is_default));
        if let Err(e) = result {
            log::warn!(target: "persistence", "could not save keybinds '{}': {}", self.config_name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::persistence::{MemoryConfigStore, PersistenceError};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every save so tests can inspect what was written.
    #[derive(Clone, Default)]
    struct RecordingStore {
        saved: Rc<RefCell<Vec<(String, String, bool)>>>,
        fail: bool,
    }

    impl ConfigStore for RecordingStore {
        fn load(&self, _config_name: &str) -> Result<Option<String>, PersistenceError> {
            if self.fail {
                Err(PersistenceError::Json("unreadable".into()))
            } else {
                Ok(None)
            }
        }

        fn save(&mut self, config_name: &str, json: &str, is_default: bool) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Json("read-only".into()));
            }
            self.saved
                .borrow_mut()
                .push((config_name.to_string(), json.to_string(), is_default));
            Ok(())
        }
    }

    fn fresh() -> BindingStore {
        BindingStore::load(Box::new(MemoryConfigStore::new()), "default")
    }

    fn bind_required(store: &mut BindingStore) {
        let keys = [("pause", "F1", 112), ("transpose_up", "F2", 113), ("transpose_down", "F3", 114),
            ("next_transpose", "F4", 115), ("previous_transpose", "F5", 116)];
        for (name, key, code) in keys {
            store.validate_and_bind(name, KeyValue::new(key, code));
        }
    }

    fn assert_unique(store: &BindingStore) {
        let keys: Vec<_> = store.bindings().iter().filter_map(|b| b.key.clone()).collect();
        let mut dedup = keys.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(keys.len(), dedup.len(), "duplicate keys in {:?}", keys);
    }

    #[test]
    fn restricted_set_is_exact() {
        assert!(is_restricted("q"));
        assert!(is_restricted("Q"));
        assert!(is_restricted("("));
        assert!(!is_restricted("F1"));
        assert!(!is_restricted("Shift"));
        assert!(!is_restricted("-"));
        assert!(!is_restricted(""));
    }

    #[test]
    fn restricted_key_is_rejected_without_change() {
        let mut store = fresh();
        assert_eq!(store.validate_and_bind("pause", KeyValue::new("a", 65)), BindOutcome::Restricted);
        assert!(!store.get("pause").unwrap().is_bound());
    }

    #[test]
    fn unknown_name_is_rejected() {
        let mut store = fresh();
        assert_eq!(store.validate_and_bind("nope", KeyValue::new("F1", 112)), BindOutcome::Unknown);
    }

    #[test]
    fn steal_clears_previous_holder() {
        let mut store = fresh();
        store.validate_and_bind("pause", KeyValue::new("F7", 118));
        let outcome = store.validate_and_bind("transpose_up", KeyValue::new("F7", 118));
        assert_eq!(outcome, BindOutcome::Bound { stolen_from: Some("pause".into()) });
        assert!(!store.get("pause").unwrap().is_bound());
        assert!(store.get("transpose_up").unwrap().holds("F7"));
        assert_unique(&store);
    }

    #[test]
    fn rebinding_same_key_to_same_name_is_noop() {
        let mut store = fresh();
        store.validate_and_bind("pause", KeyValue::new("F7", 118));
        assert_eq!(store.validate_and_bind("pause", KeyValue::new("F7", 118)), BindOutcome::Unchanged);
        assert!(store.get("pause").unwrap().holds("F7"));
    }

    #[test]
    fn uniqueness_holds_over_many_binds() {
        let mut store = fresh();
        let names = ["pause", "transpose_up", "transpose_down", "next_transpose", "previous_transpose"];
        let keys = ["F1", "F2", "F3", "F1", "F2", "F4", "F1"];
        for (i, key) in keys.iter().enumerate() {
            store.validate_and_bind(names[i % names.len()], KeyValue::new(*key, 100 + i as u64));
            assert_unique(&store);
        }
    }

    #[test]
    fn can_operate_tracks_required_bindings() {
        let mut store = fresh();
        assert!(!store.can_operate());
        bind_required(&mut store);
        assert!(store.can_operate());

        // Each required binding alone decides it: lose the key to the
        // optional binding, then take it back.
        let required = [("pause", "F1", 112), ("transpose_up", "F2", 113), ("transpose_down", "F3", 114),
            ("next_transpose", "F4", 115), ("previous_transpose", "F5", 116)];
        for (name, key, code) in required {
            let outcome = store.validate_and_bind("scroll_down", KeyValue::new(key, code));
            assert_eq!(outcome, BindOutcome::Bound { stolen_from: Some(name.to_string()) });
            assert!(!store.get(name).unwrap().is_bound());
            assert!(!store.can_operate(), "{} unbound", name);

            let outcome = store.validate_and_bind(name, KeyValue::new(key, code));
            assert_eq!(outcome, BindOutcome::Bound { stolen_from: Some("scroll_down".to_string()) });
            assert!(store.can_operate(), "{} rebound", name);
        }
    }

    #[test]
    fn optional_binding_locked_until_operable() {
        let mut store = fresh();
        assert!(!store.is_capturable("scroll_down"));
        assert_eq!(
            store.validate_and_bind("scroll_down", KeyValue::new("PageDown", 34)),
            BindOutcome::Locked
        );
        assert_eq!(store.capturable_bindings().len(), 5);

        bind_required(&mut store);
        assert!(store.is_capturable("scroll_down"));
        assert_eq!(store.capturable_bindings().len(), 6);
    }

    #[test]
    fn every_change_is_persisted() {
        let recorder = RecordingStore::default();
        let saved = recorder.saved.clone();
        let mut store = BindingStore::load(Box::new(recorder), "default");
        store.validate_and_bind("pause", KeyValue::new("F7", 118));
        store.validate_and_bind("pause", KeyValue::new("F7", 118));
        store.validate_and_bind("pause", KeyValue::new("a", 65));

        let saved = saved.borrow();
        assert_eq!(saved.len(), 1);
        let (name, json, is_default) = &saved[0];
        assert_eq!(name, "default");
        assert!(*is_default);
        assert!(json.contains("\"F7\""));
    }

    #[test]
    fn storage_failures_degrade_to_memory() {
        let mut store = BindingStore::load(Box::new(RecordingStore { fail: true, ..Default::default() }), "live");
        assert_eq!(store.bindings(), default_bindings().as_slice());
        let outcome = store.validate_and_bind("pause", KeyValue::new("F7", 118));
        assert_eq!(outcome, BindOutcome::Bound { stolen_from: None });
        assert!(store.get("pause").unwrap().holds("F7"));
    }

    #[test]
    fn reload_restores_persisted_bindings() {
        let mut first = fresh();
        first.validate_and_bind("pause", KeyValue::new("F7", 118));
        let json = KeybindRecord::from_bindings(first.bindings()).encode().unwrap();

        let second = BindingStore::load(Box::new(MemoryConfigStore::with_record("default", &json)), "default");
        assert!(second.get("pause").unwrap().holds("F7"));
        assert_eq!(second.get("pause").unwrap().key_code, Some(118));
    }

    #[test]
    fn malformed_record_falls_back_to_defaults() {
        let store = BindingStore::load(Box::new(MemoryConfigStore::with_record("default", "{oops")), "default");
        assert_eq!(store.bindings(), default_bindings().as_slice());
    }
}
