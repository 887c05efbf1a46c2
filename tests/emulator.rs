//! Round trip against a running Firestore emulator, e.g.
//! `FIRESTORE_EMULATOR_HOST=127.0.0.1:8080 cargo test -- --ignored`.

use std::env;

use approvals_seeder::{
    firestore::{Credentials, FirestoreClientOptions, FirestoreConnector},
    store::{collection, ApprovalLookup, StoreConnector},
    Catalog, Seeder,
};

fn emulator_connector() -> FirestoreConnector {
    let host = env::var("FIRESTORE_EMULATOR_HOST").unwrap_or_else(|_| "127.0.0.1:8080".into());

    FirestoreConnector::new(
        Credentials::Emulator {
            project_id: "demo-approvals".to_string(),
        },
        FirestoreClientOptions::default().emulator(&host),
    )
}

#[tokio::test]
#[ignore = "requires a running Firestore emulator"]
async fn seeds_and_finds_requests_in_the_emulator() -> Result<(), Box<dyn std::error::Error>> {
    let connector = emulator_connector();
    let approvals = collection(format!("approvals-{}", ulid::Ulid::new()));

    let report = Seeder::new(approvals.clone())
        .run(&Catalog::sample()?, &connector)
        .await?;

    assert!(report.is_complete_success(), "{report:?}");
    assert_eq!(report.succeeded(), 15);

    let mut client = connector.open().await?;
    let mut items = client
        .approvals_requested_by(&approvals, "user1@example.com")
        .await?;
    connector.close(Some(client)).await;

    items.sort_by(|a, b| a.item_name.cmp(&b.item_name));
    let found: Vec<(&str, &str)> = items
        .iter()
        .map(|i| (i.item_name.as_str(), i.status.as_str()))
        .collect();
    assert_eq!(
        found,
        [("Laptop Stand", "pending"), ("Webcam with Ring Light", "pending")]
    );

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Firestore emulator"]
async fn reseeding_creates_a_second_set_of_documents() -> Result<(), Box<dyn std::error::Error>> {
    let connector = emulator_connector();
    let approvals = collection(format!("approvals-{}", ulid::Ulid::new()));
    let seeder = Seeder::new(approvals.clone());
    let catalog = Catalog::sample()?;

    let first = seeder.run(&catalog, &connector).await?;
    let second = seeder.run(&catalog, &connector).await?;

    assert!(first
        .document_ids()
        .all(|id| second.document_ids().all(|other| other != id)));

    let mut client = connector.open().await?;
    let items = client
        .approvals_requested_by(&approvals, "user2@example.com")
        .await?;
    connector.close(Some(client)).await;

    // Ergonomic Keyboard and Docking Station, each written twice.
    assert_eq!(items.len(), 4);

    Ok(())
}
