use importer::{ImportOutcome, import_contacts};
use storage::{Database, models::NewContact, repository::contact::ContactRepository};
use uuid::Uuid;

/// Connects to `TEST_DATABASE_URL` and applies migrations. Returns `None` when
/// the variable is unset so the suite can run without Postgres.
async fn test_database(test_name: &str) -> Option<Database> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("skipping {test_name}: TEST_DATABASE_URL not set");
        return None;
    };

    let db = Database::new(&url).await.expect("connect to test database");
    db.run_migrations().await.expect("migrations run");
    Some(db)
}

async fn stored_count(db: &Database, owner: Uuid) -> usize {
    ContactRepository::new(db.pool())
        .list(owner)
        .await
        .expect("list contacts")
        .len()
}

#[tokio::test]
async fn import_against_postgres_keeps_first_of_each_email() {
    let Some(db) = test_database("import_against_postgres_keeps_first_of_each_email").await else {
        return;
    };
    let owner = Uuid::new_v4();
    let csv = "email,firstName,tags\n\
               a@x.com,Ann,\"red, blue\"\n\
               not-an-email,Bob,\n\
               a@x.com,Ann2,\n\
               B@X.com,Bea,\n\
               b@x.com,Bee,\n";

    let report = import_contacts(&db, owner, Some(csv.as_bytes()))
        .await
        .expect("import runs");

    assert_eq!(report.imported, 2);
    assert_eq!(
        report.errors,
        vec![
            "Invalid email: not-an-email",
            "Duplicate email: a@x.com",
            "Duplicate email: b@x.com",
        ]
    );
    assert_eq!(report.outcome(), ImportOutcome::Partial);

    let contacts = ContactRepository::new(db.pool())
        .list(owner)
        .await
        .expect("list contacts");
    assert_eq!(contacts.len(), 2);

    let ann = contacts.iter().find(|c| c.email == "a@x.com").unwrap();
    assert_eq!(ann.first_name, "Ann");
    assert_eq!(ann.tags.0, vec!["red", "blue"]);
    let bea = contacts.iter().find(|c| c.email == "b@x.com").unwrap();
    assert_eq!(bea.first_name, "Bea");
}

#[tokio::test]
async fn reimport_only_adds_net_new_contacts() {
    let Some(db) = test_database("reimport_only_adds_net_new_contacts").await else {
        return;
    };
    let owner = Uuid::new_v4();

    import_contacts(&db, owner, Some(b"email\na@x.com\nb@x.com\n".as_slice()))
        .await
        .expect("first import runs");
    let before = stored_count(&db, owner).await;

    let report = import_contacts(
        &db,
        owner,
        Some(b"email\nA@x.com\nc@x.com\nb@x.com\n".as_slice()),
    )
    .await
    .expect("second import runs");

    assert_eq!(report.imported, 1);
    assert_eq!(
        report.errors,
        vec!["Duplicate email: a@x.com", "Duplicate email: b@x.com"]
    );
    assert_eq!(
        stored_count(&db, owner).await,
        before + report.imported as usize
    );
}

#[tokio::test]
async fn same_email_is_independent_per_owner() {
    let Some(db) = test_database("same_email_is_independent_per_owner").await else {
        return;
    };
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let csv = b"email\nshared@x.com\n".as_slice();

    let first_report = import_contacts(&db, first, Some(csv)).await.expect("import");
    let second_report = import_contacts(&db, second, Some(csv)).await.expect("import");

    assert_eq!(first_report.imported, 1);
    assert_eq!(second_report.imported, 1);
    assert!(second_report.errors.is_empty());
    assert_eq!(stored_count(&db, first).await, 1);
    assert_eq!(stored_count(&db, second).await, 1);
}

#[tokio::test]
async fn bulk_insert_reports_failed_positions() {
    let Some(db) = test_database("bulk_insert_reports_failed_positions").await else {
        return;
    };
    let owner = Uuid::new_v4();
    let repo = ContactRepository::new(db.pool());
    let candidate = |email: &str, first_name: &str| NewContact {
        email: email.to_string(),
        first_name: first_name.to_string(),
        ..Default::default()
    };

    repo.create(owner, &candidate("taken@x.com", "Existing"))
        .await
        .expect("seed contact");

    let report = repo
        .insert_many_unordered(
            owner,
            &[
                candidate("new@x.com", "First"),
                candidate("taken@x.com", "Clash"),
                candidate("new@x.com", "Second"),
            ],
        )
        .await
        .expect("bulk insert runs");

    assert_eq!(report.inserted_count(), 1);
    let positions: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
    assert_eq!(positions, vec![1, 2]);

    let contacts = repo.list(owner).await.expect("list contacts");
    assert_eq!(contacts.len(), 2);
    let taken = contacts.iter().find(|c| c.email == "taken@x.com").unwrap();
    assert_eq!(taken.first_name, "Existing");
    let new = contacts.iter().find(|c| c.email == "new@x.com").unwrap();
    assert_eq!(new.first_name, "First");
}
