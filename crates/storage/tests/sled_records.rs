use furya_storage::{get_record, put_record, MemoryStorage, SledStorage, Storage};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Cursor {
    months_since_genesis: u64,
    month_started_block: u64,
}

fn exercise<S: Storage>(store: &S) {
    let cursor = Cursor {
        months_since_genesis: 3,
        month_started_block: 12_000,
    };
    put_record(store, "mint/state", &cursor).unwrap();
    store.flush().unwrap();

    let loaded: Option<Cursor> = get_record(store, "mint/state").unwrap();
    assert_eq!(loaded, Some(cursor));
}

#[test]
fn memory_and_sled_backends_agree() {
    let dir = TempDir::new().unwrap();
    let sled_store = SledStorage::new(dir.path()).unwrap();
    let memory = MemoryStorage::new();

    exercise(&sled_store);
    exercise(&memory);

    assert_eq!(
        sled_store.get_raw("mint/state").unwrap(),
        memory.get_raw("mint/state").unwrap()
    );
}

#[test]
fn sled_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = SledStorage::new(dir.path()).unwrap();
        put_record(
            &store,
            "mint/state",
            &Cursor {
                months_since_genesis: 1,
                month_started_block: 50,
            },
        )
        .unwrap();
        store.flush().unwrap();
    }

    let reopened = SledStorage::new(dir.path()).unwrap();
    let loaded: Cursor = get_record(&reopened, "mint/state").unwrap().unwrap();
    assert_eq!(loaded.month_started_block, 50);
}
