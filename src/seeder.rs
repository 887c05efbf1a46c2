use crate::{
    catalog::Catalog,
    error::{RecordWriteError, SeedError},
    report::{SeedOutcome, SeedReport},
    store::{collection, CollectionReference, DocumentStore, StoreConnector},
};

pub const DEFAULT_COLLECTION: &str = "approvals";

/// Writes every catalog entry to a collection, one at a time.
///
/// A failed write is recorded in the report and the run moves on to the next
/// entry. Nothing is retried and nothing already written is rolled back, so
/// running the seeder twice creates every document twice.
#[derive(Debug, Clone)]
pub struct Seeder {
    collection: CollectionReference,
}

impl Default for Seeder {
    fn default() -> Self {
        Self::new(collection(DEFAULT_COLLECTION))
    }
}

impl Seeder {
    pub fn new(collection: CollectionReference) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &CollectionReference {
        &self.collection
    }

    /// Opens a store, seeds it, and closes it again.
    ///
    /// Only a failure to open the store is returned as an error; in that case
    /// no document has been written. The connector is closed exactly once on
    /// either path.
    pub async fn run<C: StoreConnector>(
        &self,
        catalog: &Catalog,
        connector: &C,
    ) -> Result<SeedReport, SeedError> {
        let mut store = match connector.open().await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open document store");
                connector.close(None).await;
                return Err(SeedError::StoreConnection(e));
            }
        };

        let report = self.seed(catalog, &mut store).await;
        connector.close(Some(store)).await;

        Ok(report)
    }

    /// Submits each entry of `catalog`, in order, to an already open store.
    #[tracing::instrument(
        name = "Seed catalog",
        skip_all,
        fields(collection = %self.collection, entries = catalog.len())
    )]
    pub async fn seed<S: DocumentStore>(&self, catalog: &Catalog, store: &mut S) -> SeedReport {
        let mut report = SeedReport::new(self.collection.to_string());

        for (index, template) in catalog.iter().enumerate() {
            let record = template.to_record();
            let item_name = template.item_name.clone();

            match store.add_document(&self.collection, &record).await {
                Ok(document_id) => {
                    tracing::info!(index, %document_id, item = %item_name, "Added document");
                    report.push(SeedOutcome::Created {
                        index,
                        document_id,
                        item_name,
                    });
                }
                Err(source) => {
                    tracing::error!(
                        index,
                        item = %item_name,
                        error = %source,
                        "Failed to add document"
                    );
                    report.push(SeedOutcome::Failed {
                        index,
                        error: RecordWriteError { item_name, source },
                    });
                }
            }
        }

        tracing::info!(
            added = report.succeeded(),
            failed = report.failed(),
            "Finished seeding"
        );

        report
    }
}
