//! Structural operations and the tree invariants they must preserve.

use rofsim::{FsError, ItemKind, MemorySink, OpKind, Store};

fn store() -> Store {
    Store::new(Box::new(MemorySink::new()))
}

#[test]
fn duplicate_sibling_names_are_rejected() {
    let mut s = store();
    let docs = s.create_folder("documents", None).unwrap();
    s.create_file("a.txt", "one", Some(docs)).unwrap();
    let before = s.statistics().total_items;

    let err = s.create_file("a.txt", "two", Some(docs)).unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(name) if name == "a.txt"));

    // A folder cannot shadow a file either; uniqueness is per name.
    let err = s.create_folder("a.txt", Some(docs)).unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(_)));

    assert_eq!(s.statistics().total_items, before);
}

#[test]
fn same_name_in_different_folders_is_fine() {
    let mut s = store();
    let a = s.create_folder("a", None).unwrap();
    let b = s.create_folder("b", None).unwrap();
    s.create_file("notes.txt", "", Some(a)).unwrap();
    s.create_file("notes.txt", "", Some(b)).unwrap();
    assert_eq!(s.statistics().files, 2);
}

#[test]
fn root_is_never_deletable() {
    let mut s = store();
    s.seed_demo();
    let before = s.statistics();

    let err = s.delete_item(s.root()).unwrap_err();
    assert!(matches!(err, FsError::InvalidOperation(_)));
    assert_eq!(s.statistics(), before);
    assert_eq!(s.path(s.root()).unwrap(), "/root");
}

#[test]
fn delete_destroys_the_whole_subtree() {
    let mut s = store();
    let docs = s.create_folder("documents", None).unwrap();
    let sub = s.create_folder("drafts", Some(docs)).unwrap();
    let file = s.create_file("a.txt", "hi", Some(sub)).unwrap();

    s.delete_item(docs).unwrap();
    assert_eq!(s.statistics().total_items, 0);
    assert!(matches!(s.item(docs), Err(FsError::NotFound(_))));
    assert!(matches!(s.item(sub), Err(FsError::NotFound(_))));
    assert!(matches!(s.item(file), Err(FsError::NotFound(_))));

    // Deleting an already-destroyed handle resolves to NotFound.
    assert!(matches!(s.delete_item(docs), Err(FsError::NotFound(_))));

    // The audit record carries the pre-removal path and kind.
    let delete = s
        .log()
        .entries()
        .iter()
        .find(|r| r.kind == OpKind::Delete)
        .unwrap();
    assert_eq!(delete.description, "Deleted folder: /root/documents");
}

#[test]
fn rename_collides_only_with_other_siblings() {
    let mut s = store();
    let a = s.create_file("a.txt", "", None).unwrap();
    s.create_file("b.txt", "", None).unwrap();

    let err = s.rename_item(a, "b.txt").unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(name) if name == "b.txt"));
    assert_eq!(s.item(a).unwrap().name(), "a.txt");

    // Renaming to its own current name is a trivial successful rename.
    s.rename_item(a, "a.txt").unwrap();
    assert_eq!(s.item(a).unwrap().name(), "a.txt");

    s.rename_item(a, "c.txt").unwrap();
    assert_eq!(s.path(a).unwrap(), "/root/c.txt");

    let renames: Vec<&str> = s
        .log()
        .entries()
        .iter()
        .filter(|r| r.kind == OpKind::Rename)
        .map(|r| r.description.as_str())
        .collect();
    assert_eq!(
        renames,
        vec![
            "Renamed file: /root/a.txt -> /root/a.txt",
            "Renamed file: /root/a.txt -> /root/c.txt",
        ]
    );
}

#[test]
fn renaming_an_ancestor_moves_descendant_paths() {
    let mut s = store();
    let docs = s.create_folder("documents", None).unwrap();
    let sub = s.create_folder("drafts", Some(docs)).unwrap();
    let file = s.create_file("a.txt", "hi", Some(sub)).unwrap();
    assert_eq!(s.path(file).unwrap(), "/root/documents/drafts/a.txt");

    s.rename_item(docs, "papers").unwrap();
    assert_eq!(s.path(file).unwrap(), "/root/papers/drafts/a.txt");
    assert_eq!(s.path(sub).unwrap(), "/root/papers/drafts");
    assert_eq!(s.resolve_path("/root/papers/drafts/a.txt").unwrap(), file);
}

#[test]
fn folder_size_tracks_every_mutation() {
    let mut s = store();
    let docs = s.create_folder("documents", None).unwrap();
    let a = s.create_file("a.txt", "hi", Some(docs)).unwrap();
    let b = s.create_file("b.txt", "hello", Some(docs)).unwrap();
    assert_eq!(s.info(docs).unwrap().size, 7);

    s.modify_file(a, "hi there").unwrap();
    assert_eq!(s.info(docs).unwrap().size, 13);

    s.delete_item(b).unwrap();
    assert_eq!(s.info(docs).unwrap().size, 8);

    s.rename_item(a, "renamed.txt").unwrap();
    assert_eq!(s.info(docs).unwrap().size, 8);
}

#[test]
fn listing_is_preorder_with_insertion_order() {
    let mut s = store();
    let a = s.create_folder("a", None).unwrap();
    let a1 = s.create_file("a1.txt", "", Some(a)).unwrap();
    let a2 = s.create_folder("a2", Some(a)).unwrap();
    let a2x = s.create_file("x.txt", "", Some(a2)).unwrap();
    let b = s.create_file("b.txt", "", None).unwrap();

    assert_eq!(s.list_all(None).unwrap(), vec![a, a1, a2, a2x, b]);
    assert_eq!(s.list_all(Some(a)).unwrap(), vec![a1, a2, a2x]);
    assert!(matches!(
        s.list_all(Some(b)),
        Err(FsError::InvalidOperation(_))
    ));
}

#[test]
fn statistics_scenario() {
    let mut s = store();
    let docs = s.create_folder("docs", None).unwrap();
    let file = s.create_file("a.txt", "hi", Some(docs)).unwrap();

    let stats = s.statistics();
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.files, 1);
    assert_eq!(stats.folders, 1);
    assert_eq!(stats.total_size, 2);
    assert!(!stats.read_only);

    s.set_read_only(true);
    assert!(matches!(
        s.modify_file(file, "hello"),
        Err(FsError::ReadOnly { .. })
    ));
    assert_eq!(s.statistics().total_size, 2);

    s.set_read_only(false);
    s.modify_file(file, "hello").unwrap();
    assert_eq!(s.statistics().total_size, 5);
}

#[test]
fn kinds_are_fixed_at_creation() {
    let mut s = store();
    let docs = s.create_folder("documents", None).unwrap();
    let file = s.create_file("a.txt", "", Some(docs)).unwrap();
    assert_eq!(s.item(docs).unwrap().kind(), ItemKind::Folder);
    assert_eq!(s.item(file).unwrap().kind(), ItemKind::File);

    s.rename_item(docs, "other").unwrap();
    s.modify_file(file, "content").unwrap();
    assert_eq!(s.item(docs).unwrap().kind(), ItemKind::Folder);
    assert_eq!(s.item(file).unwrap().kind(), ItemKind::File);
}

#[test]
fn timestamps_never_decrease() {
    let mut s = store();
    let file = s.create_file("a.txt", "", None).unwrap();
    let created = s.item(file).unwrap().created_at();
    assert_eq!(s.item(file).unwrap().modified_at(), created);

    s.modify_file(file, "x").unwrap();
    let node = s.item(file).unwrap();
    assert_eq!(node.created_at(), created, "created_at is immutable");
    assert!(node.modified_at() >= created);
}
