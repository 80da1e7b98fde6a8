#[cfg(test)]
mod tests {
    use crate::state::bindings::{default_bindings, is_restricted};
    use crate::state::persistence::record::{merge, KeybindRecord};
    use crate::state::persistence::{
        ConfigStore, MemoryConfigStore, PersistenceError, SqliteConfigStore, KEYBIND_SCHEMA_VERSION,
    };
    use transpose_types::KeyValue;

    #[test]
    fn sqlite_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.db");
        {
            let mut store = SqliteConfigStore::open(&path).unwrap();
            store.save("default", r#"{"version":1,"keys":{}}"#, true).unwrap();
        }
        let store = SqliteConfigStore::open(&path).unwrap();
        assert_eq!(store.load("default").unwrap().as_deref(), Some(r#"{"version":1,"keys":{}}"#));
        assert_eq!(store.is_default("default").unwrap(), Some(true));
        assert_eq!(store.schema_version().unwrap(), Some(1));
    }

    #[test]
    fn sqlite_missing_row_is_none() {
        let store = SqliteConfigStore::open_in_memory().unwrap();
        assert_eq!(store.load("default").unwrap(), None);
        assert_eq!(store.is_default("default").unwrap(), None);
    }

    #[test]
    fn sqlite_last_write_wins() {
        let mut store = SqliteConfigStore::open_in_memory().unwrap();
        store.save("live", "{}", false).unwrap();
        store.save("live", r#"{"keys":{}}"#, false).unwrap();
        assert_eq!(store.load("live").unwrap().as_deref(), Some(r#"{"keys":{}}"#));
    }

    #[test]
    fn config_name_is_bound_not_interpolated() {
        let mut store = SqliteConfigStore::open_in_memory().unwrap();
        let name = "x'); DROP TABLE KeyBindConfig; --";
        store.save(name, "{}", false).unwrap();
        assert_eq!(store.load(name).unwrap().as_deref(), Some("{}"));
        assert_eq!(store.load("default").unwrap(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryConfigStore::new();
        store.save("default", "{}", true).unwrap();
        assert_eq!(store.load("default").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn record_without_version_reads_as_legacy() {
        let record = KeybindRecord::decode(
            r#"{"keys":{"pause":{"purpose":"Pause All Binds","value":{"key":"F7","keyCode":118},"required":true}}}"#,
        )
        .unwrap();
        assert_eq!(record.version, 1);
        assert_eq!(record.keys["pause"].value, Some(KeyValue::new("F7", 118)));
    }

    #[test]
    fn newer_record_is_refused() {
        let err = KeybindRecord::decode(r#"{"version":99,"keys":{}}"#).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { found: 99, supported } if supported == KEYBIND_SCHEMA_VERSION
        ));
    }

    #[test]
    fn garbage_record_is_json_error() {
        assert!(matches!(KeybindRecord::decode("not json"), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn merge_stored_wins_and_unknown_dropped() {
        let record = KeybindRecord::decode(
            r#"{"version":1,"keys":{
                "pause":{"purpose":"Hold","value":{"key":"F7","keyCode":118}},
                "ghost":{"purpose":"Gone","value":{"key":"F9","keyCode":120},"required":true}
            }}"#,
        )
        .unwrap();
        let merged = merge(&default_bindings(), record, is_restricted);
        assert_eq!(merged.len(), default_bindings().len());
        let pause = &merged[0];
        assert_eq!(pause.purpose, "Hold");
        assert!(pause.required);
        assert!(pause.holds("F7"));
        assert!(merged.iter().all(|b| b.name != "ghost"));
        assert!(merged.iter().skip(1).all(|b| !b.is_bound()));
    }

    #[test]
    fn merge_drops_restricted_and_duplicate_keys() {
        let record = KeybindRecord::decode(
            r#"{"keys":{
                "pause":{"value":{"key":"F7","keyCode":118}},
                "transpose_up":{"value":{"key":"F7","keyCode":118}},
                "transpose_down":{"value":{"key":"q","keyCode":81}}
            }}"#,
        )
        .unwrap();
        let merged = merge(&default_bindings(), record, is_restricted);
        assert!(merged[0].holds("F7"));
        assert!(!merged[1].is_bound());
        assert!(!merged[2].is_bound());
    }

    #[test]
    fn encode_carries_version() {
        let json = KeybindRecord::from_bindings(&default_bindings()).encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["keys"]["scroll_down"]["required"], false);
        assert!(value["keys"]["pause"]["value"].is_null());
    }
}
