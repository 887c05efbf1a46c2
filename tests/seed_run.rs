mod common;

use approvals_seeder::{
    error::{SeedError, StoreError},
    store::{collection, memory::InMemoryConnector, FieldValue},
    ApprovalRequest, Catalog, SeedOutcome, Seeder,
};
use common::{item_names, ScriptedConnector, ScriptedStore};

#[tokio::test]
async fn writes_every_entry_once_in_catalog_order() {
    let catalog = Catalog::sample().unwrap();
    let connector = ScriptedConnector::default();

    let report = Seeder::default().run(&catalog, &connector).await.unwrap();

    assert_eq!(report.total(), catalog.len());
    assert_eq!(report.succeeded(), catalog.len());
    assert_eq!(report.failed(), 0);
    assert!(report.is_complete_success());

    let calls = connector.store.calls();
    assert_eq!(calls.len(), catalog.len());
    assert!(calls.iter().all(|(c, _)| c == "approvals"));
    assert_eq!(
        item_names(&calls),
        catalog.iter().map(|r| r.item_name.clone()).collect::<Vec<_>>()
    );

    for (position, outcome) in report.outcomes().iter().enumerate() {
        assert_eq!(outcome.index(), position);
    }
}

#[tokio::test]
async fn one_failed_write_does_not_stop_the_run() {
    let catalog = Catalog::sample().unwrap();
    let connector = ScriptedConnector {
        store: ScriptedStore::failing_at(vec![4]),
        ..Default::default()
    };

    let report = Seeder::default().run(&catalog, &connector).await.unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), catalog.len() - 1);
    assert_eq!(connector.store.calls().len(), catalog.len());

    let failure = report.failures().next().unwrap();
    assert_eq!(failure.index(), 4);
    assert_eq!(failure.item_name(), "Monitor Arm");
    assert_eq!(
        failure.to_string(),
        "Error adding document Monitor Arm: quota exceeded"
    );
    assert!(report.outcomes()[5].is_success());
}

#[tokio::test]
async fn every_write_failing_still_completes() {
    let catalog = Catalog::sample().unwrap();
    let connector = ScriptedConnector {
        store: ScriptedStore::failing_at((0..catalog.len()).collect()),
        ..Default::default()
    };

    let report = Seeder::default().run(&catalog, &connector).await.unwrap();

    assert_eq!(report.failed(), catalog.len());
    assert_eq!(report.succeeded(), 0);
    assert_eq!(connector.closed(), 1);
}

#[tokio::test]
async fn unreachable_store_is_a_hard_error_with_no_writes() {
    let connector = ScriptedConnector {
        refuse_to_open: true,
        ..Default::default()
    };

    let result = Seeder::default()
        .run(&Catalog::sample().unwrap(), &connector)
        .await;

    assert!(matches!(
        result,
        Err(SeedError::StoreConnection(StoreError::Unauthenticated(_)))
    ));
    assert!(connector.store.calls().is_empty());
    assert_eq!(connector.opened(), 1);
    assert_eq!(connector.closed(), 1);
    assert_eq!(connector.closed_unopened(), 1);
}

#[tokio::test]
async fn store_is_opened_and_closed_exactly_once() {
    let connector = ScriptedConnector::default();

    Seeder::default()
        .run(&Catalog::sample().unwrap(), &connector)
        .await
        .unwrap();

    assert_eq!(connector.opened(), 1);
    assert_eq!(connector.closed(), 1);
    assert_eq!(connector.closed_unopened(), 0);
}

#[tokio::test]
async fn seeding_twice_duplicates_documents() {
    let catalog = Catalog::sample().unwrap();
    let connector = InMemoryConnector::default();
    let seeder = Seeder::default();

    let first = seeder.run(&catalog, &connector).await.unwrap();
    let second = seeder.run(&catalog, &connector).await.unwrap();

    assert_eq!(connector.store().len().await, 2 * catalog.len());

    let mut ids: Vec<&str> = first.document_ids().chain(second.document_ids()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 2 * catalog.len());

    let laptop_stands = connector
        .store()
        .documents()
        .await
        .into_iter()
        .filter(|d| {
            d.fields.get("itemName").and_then(FieldValue::as_str) == Some("Laptop Stand")
        })
        .count();
    assert_eq!(laptop_stands, 2);
}

#[tokio::test]
async fn single_laptop_stand() {
    let catalog = Catalog::new(vec![ApprovalRequest::pending(
        "Laptop Stand",
        "user1@example.com",
        100.0,
    )])
    .unwrap();
    let connector = InMemoryConnector::default();

    let report = Seeder::default().run(&catalog, &connector).await.unwrap();

    assert_eq!(report.total(), 1);
    assert_eq!(report.failed(), 0);
    match &report.outcomes()[0] {
        SeedOutcome::Created {
            index,
            document_id,
            item_name,
        } => {
            assert_eq!(*index, 0);
            assert_eq!(item_name, "Laptop Stand");
            assert!(!document_id.is_empty());
        }
        other => panic!("expected a created document, got {other:?}"),
    }

    let stored = connector.store().documents().await;
    assert!(matches!(
        stored[0].fields.get("requestedAt"),
        Some(FieldValue::Timestamp(_))
    ));
    assert_eq!(stored[0].fields.get("amount"), Some(&FieldValue::Integer(100)));
}

#[tokio::test]
async fn seeds_nested_collections() {
    let connector = InMemoryConnector::default();
    let teams = collection("teams").doc("platform").collection("approvals");

    let report = Seeder::new(teams.clone())
        .run(&Catalog::sample().unwrap(), &connector)
        .await
        .unwrap();

    assert_eq!(report.collection(), "teams/platform/approvals");
    assert_eq!(connector.store().documents_in(&teams).await.len(), 15);
    assert!(connector
        .store()
        .documents_in(&collection("approvals"))
        .await
        .is_empty());
}

#[tokio::test]
async fn empty_catalog_writes_nothing() {
    let connector = ScriptedConnector::default();

    let report = Seeder::default()
        .run(&Catalog::new(vec![]).unwrap(), &connector)
        .await
        .unwrap();

    assert_eq!(report.total(), 0);
    assert!(connector.store.calls().is_empty());
    assert_eq!(connector.closed(), 1);
}
