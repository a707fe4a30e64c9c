mod common;

use common::MemoryStore;
use importer::{ImportOutcome, ImporterError, import_contacts};
use uuid::Uuid;

const SCENARIO: &str = "email,firstName,tags\n\
                        a@x.com,Ann,\"red, blue\"\n\
                        not-an-email,Bob,\n\
                        a@x.com,Ann2,\n";

#[tokio::test]
async fn imports_valid_rows_and_reports_invalid_and_duplicate_rows() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();

    let report = import_contacts(&store, owner, Some(SCENARIO.as_bytes()))
        .await
        .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(
        report.errors,
        vec!["Invalid email: not-an-email", "Duplicate email: a@x.com"]
    );
    assert_eq!(report.outcome(), ImportOutcome::Partial);

    let ann = store.find(owner, "a@x.com").unwrap();
    assert_eq!(ann.first_name, "Ann");
    assert_eq!(ann.tags.0, vec!["red", "blue"]);
    assert_eq!(store.contacts_for(owner).len(), 1);
}

#[tokio::test]
async fn header_only_upload_is_an_empty_success() {
    let store = MemoryStore::new();

    let report = import_contacts(&store, Uuid::new_v4(), Some(b"email,firstName\n".as_slice()))
        .await
        .unwrap();

    assert_eq!(report.imported, 0);
    assert!(report.errors.is_empty());
    assert_eq!(report.outcome(), ImportOutcome::Success);
}

#[tokio::test]
async fn empty_upload_is_an_empty_success() {
    let store = MemoryStore::new();

    let report = import_contacts(&store, Uuid::new_v4(), Some(b"".as_slice()))
        .await
        .unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.outcome(), ImportOutcome::Success);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn missing_file_fails_before_touching_the_store() {
    let store = MemoryStore::new();

    let result = import_contacts(&store, Uuid::new_v4(), None).await;

    assert!(matches!(result, Err(ImporterError::MissingFile)));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn header_without_email_column_fails_fast() {
    let store = MemoryStore::new();
    let csv = "name,company\nAnn,Acme\n";

    let result = import_contacts(&store, Uuid::new_v4(), Some(csv.as_bytes())).await;

    assert!(matches!(result, Err(ImporterError::MissingEmailColumn)));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn duplicates_are_detected_after_case_normalization() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let csv = "email,firstName\nAnn@X.com,Ann\n  ann@x.COM ,Annie\n";

    let report = import_contacts(&store, owner, Some(csv.as_bytes()))
        .await
        .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(report.errors, vec!["Duplicate email: ann@x.com"]);
    assert_eq!(store.find(owner, "ann@x.com").unwrap().first_name, "Ann");
}

#[tokio::test]
async fn existing_contacts_are_reported_as_duplicates() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    store.seed(owner, "a@x.com");
    let before = store.contacts_for(owner).len();
    let csv = "email\nb@x.com\na@x.com\nc@x.com\n";

    let report = import_contacts(&store, owner, Some(csv.as_bytes()))
        .await
        .unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.errors, vec!["Duplicate email: a@x.com"]);
    assert_eq!(
        store.contacts_for(owner).len(),
        before + report.imported as usize
    );
}

#[tokio::test]
async fn uniqueness_is_scoped_to_the_owner() {
    let store = MemoryStore::new();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    store.seed(first, "a@x.com");

    let report = import_contacts(&store, second, Some(b"email\na@x.com\n".as_slice()))
        .await
        .unwrap();

    assert_eq!(report.imported, 1);
    assert!(report.errors.is_empty());
    assert_eq!(store.contacts_for(first).len(), 1);
    assert_eq!(store.contacts_for(second).len(), 1);
}

#[tokio::test]
async fn rejecting_the_same_row_twice_gives_the_same_reason() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let csv = "email,firstName\nbob@,Bob\n";

    let first = import_contacts(&store, owner, Some(csv.as_bytes()))
        .await
        .unwrap();
    let second = import_contacts(&store, owner, Some(csv.as_bytes()))
        .await
        .unwrap();

    assert_eq!(first.errors, vec!["Invalid email: bob@"]);
    assert_eq!(first.errors, second.errors);
    assert!(store.contacts_for(owner).is_empty());
}

#[tokio::test]
async fn blank_lines_and_unknown_columns_are_ignored() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let csv = "email,lastName,source,notes\n\na@x.com, Lee ,fair,  met in May \n\n\nb@x.com,,web,\n";

    let report = import_contacts(&store, owner, Some(csv.as_bytes()))
        .await
        .unwrap();

    assert_eq!(report.imported, 2);
    assert!(report.errors.is_empty());
    let a = store.find(owner, "a@x.com").unwrap();
    assert_eq!(a.last_name, "Lee");
    assert_eq!(a.notes, "met in May");
    assert!(a.tags.0.is_empty());
}

#[tokio::test]
async fn malformed_rows_do_not_block_the_batch() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let csv = "email,firstName\na@x.com,Ann,surplus\nb@x.com,Bea\n";

    let report = import_contacts(&store, owner, Some(csv.as_bytes()))
        .await
        .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Error processing row: "));
    assert!(store.find(owner, "b@x.com").is_some());
}

#[tokio::test]
async fn validation_errors_precede_duplicate_errors() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let csv = "email\nz@x.com\nz@x.com\nbroken\n";

    let report = import_contacts(&store, owner, Some(csv.as_bytes()))
        .await
        .unwrap();

    assert_eq!(
        report.errors,
        vec!["Invalid email: broken", "Duplicate email: z@x.com"]
    );
}

#[tokio::test]
async fn unavailable_store_fails_the_import() {
    let store = MemoryStore::unavailable();

    let result =
        import_contacts(&store, Uuid::new_v4(), Some(b"email\na@x.com\n".as_slice())).await;

    assert!(matches!(result, Err(ImporterError::StorageError(_))));
    assert_eq!(store.calls(), 1);
}
