//! Round-trip and merge properties of parameter tables.

use frigg_core::{merge, scan, Param, ParamStore, ParamTable, TokenPattern};
use frigg_fs::NativeFileSystem;
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn param_strategy() -> impl Strategy<Value = Param> {
    ("[A-Za-z0-9_]{0,8}", "[ -~]{0,12}", prop::sample::select(vec!["", "int", "string", "bool"]))
        .prop_map(|(name, value, param_type)| Param::new(name, value, param_type))
}

fn table_strategy() -> impl Strategy<Value = ParamTable> {
    prop::collection::vec(("@@[A-Za-z0-9]{1,6}@@", param_strategy()), 0..12)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn merge_with_itself_is_identity(table in table_strategy(), delete_missing in any::<bool>()) {
        prop_assert_eq!(merge(&table, &table, delete_missing), table);
    }

    #[test]
    fn merge_keeps_exactly_current_tokens_when_deleting(
        current in table_strategy(),
        persisted in table_strategy(),
    ) {
        let merged = merge(&current, &persisted, true);
        let tokens: Vec<_> = merged.tokens().collect();
        let expected: Vec<_> = current.tokens().collect();
        prop_assert_eq!(tokens, expected);
    }

    #[test]
    fn json_round_trip(table in table_strategy()) {
        let json = table.to_json_pretty().unwrap();
        prop_assert_eq!(ParamTable::from_json(&json).unwrap(), table);
    }
}

#[tokio::test]
async fn test_save_load_save_round_trip_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let store = ParamStore::new(Arc::new(NativeFileSystem::new()));
    let path = temp_dir.path().join("run.usql.json");

    let mut table = ParamTable::new();
    table.insert("@@Input1@@", Param::new("Input1", "/data/in.tsv", "string"));
    table.insert("@@Count@@", Param::new("Count", "13", "int"));
    table.insert("@@Flag@@", Param::named("Flag"));

    store.save(&table, &path).await.unwrap();
    let loaded = store.load(&path).await.unwrap().unwrap();
    assert_eq!(loaded, table);

    store.save(&loaded, &path).await.unwrap();
    let reloaded = store.load(&path).await.unwrap().unwrap();
    assert_eq!(reloaded, table);
}

#[tokio::test]
async fn test_rescan_picks_up_saved_values() {
    let temp_dir = TempDir::new().unwrap();
    let store = ParamStore::new(Arc::new(NativeFileSystem::new()));
    let path = temp_dir.path().join("run.usql.json");
    let text = "SELECT * FROM @@Table@@ WHERE n > @@Min@@";

    let first = scan(text, &TokenPattern::default());
    store.save(&first, &path).await.unwrap();

    // The user fills in values by hand.
    let mut edited = first.clone();
    *edited.get_mut("@@Min@@").unwrap() = Param::new("Min", "10", "int");
    store.save(&edited, &path).await.unwrap();

    let rescanned = scan(text, &TokenPattern::default());
    let merged = store.update(&rescanned, &path, true).await.unwrap().unwrap();
    assert_eq!(merged.get("@@Min@@").unwrap(), &Param::new("Min", "10", "int"));
    assert_eq!(merged.get("@@Table@@").unwrap(), &Param::named("Table"));
}
