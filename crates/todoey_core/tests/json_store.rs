use todoey_core::{
    open_store, CategoryRepository, CategoryService, ItemOrder, ItemService, JsonFileRepository,
    RepoError, StoreConfig, StoreError,
};

#[test]
fn reopened_store_sees_previous_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");

    let (home_id, eggos_id) = {
        let repo = JsonFileRepository::open(&path).unwrap();
        let categories = CategoryService::new(&repo);
        let items = ItemService::new(&repo);
        let home = categories.add_category("Home").unwrap();
        categories
            .set_category_colour(home.uuid, Some("#ff8800"))
            .unwrap();
        let eggos = items.add_item(home.uuid, "Buy Eggos").unwrap();
        items.add_item(home.uuid, "Milk").unwrap();
        items.toggle_done(eggos.uuid).unwrap();
        (home.uuid, eggos.uuid)
    };

    let repo = JsonFileRepository::open(&path).unwrap();
    let categories = CategoryService::new(&repo);
    let items = ItemService::new(&repo);
    let home = categories.get_category(home_id).unwrap().unwrap();
    assert_eq!(home.name, "Home");
    assert_eq!(home.colour.as_deref(), Some("#FF8800"));
    let listed = items.list_items(home_id, ItemOrder::Insertion).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].uuid, eggos_id);
    assert!(listed[0].done);
    assert!(!listed[1].done);
}

#[test]
fn missing_file_opens_empty_without_creating_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.json");

    let repo = JsonFileRepository::open(&path).unwrap();

    assert!(repo.list_categories().unwrap().is_empty());
    assert!(!path.exists());
    assert_eq!(repo.path(), path.as_path());
}

#[test]
fn failed_write_keeps_memory_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("todoey.json");

    let repo = JsonFileRepository::open(&path).unwrap();
    let categories = CategoryService::new(&repo);

    let err = categories.add_category("Work").unwrap_err();
    assert!(matches!(err, StoreError::Persistence(RepoError::Io(_))));
    assert!(categories.list_categories().unwrap().is_empty());
    assert!(!path.exists());
}

#[test]
fn corrupt_file_is_rejected_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let err = JsonFileRepository::open(&path).unwrap_err();
    assert!(matches!(err, RepoError::Serialization(_)));
}

#[test]
fn unsupported_document_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");
    std::fs::write(&path, br#"{"version": 99, "categories": []}"#).unwrap();

    let err = JsonFileRepository::open(&path).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn config_selects_json_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");
    let config = StoreConfig::from_json_str(&format!(
        r#"{{"backend": "json_file", "path": {}}}"#,
        serde_json::to_string(&path).unwrap()
    ))
    .unwrap();

    let store = open_store(&config).unwrap();
    CategoryService::new(&store).add_category("Work").unwrap();
    drop(store);

    let reopened = JsonFileRepository::open(&path).unwrap();
    assert_eq!(reopened.list_categories().unwrap().len(), 1);
}
