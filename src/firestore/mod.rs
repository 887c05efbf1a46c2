//! # Firestore backend
//!
//! A [`DocumentStore`](crate::store::DocumentStore) backed by Cloud Firestore's
//! gRPC API, or by the local Firestore emulator.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use approvals_seeder::{
//!     firestore::{Credentials, FirestoreClientOptions, FirestoreConnector},
//!     Catalog, Seeder, ServiceAccount,
//! };
//!
//! let service_account = ServiceAccount::from_file("./service-account.json")?;
//! let connector = FirestoreConnector::new(
//!     Credentials::ServiceAccount(service_account),
//!     FirestoreClientOptions::default(),
//! );
//!
//! let report = Seeder::default().run(&Catalog::sample()?, &connector).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! Documents are created through a single-write commit per record. Fields
//! holding [`FieldValue::ServerTimestamp`](crate::store::FieldValue::ServerTimestamp)
//! are sent as `REQUEST_TIME` transforms, so Firestore stamps them with the
//! commit time.

use async_trait::async_trait;

use crate::{error::StoreError, store::StoreConnector, ServiceAccount};

pub mod client;
mod encode;
mod query;
mod token_provider;

pub use client::{FirestoreClient, FirestoreClientOptions};

/// How the client authenticates against Firestore.
#[derive(Clone)]
pub enum Credentials {
    /// Sign short-lived JWTs with the service account's private key.
    ServiceAccount(ServiceAccount),
    /// The emulator accepts any project and a fixed admin token.
    Emulator { project_id: String },
}

impl Credentials {
    pub fn project_id(&self) -> &str {
        match self {
            Credentials::ServiceAccount(service_account) => &service_account.project_id,
            Credentials::Emulator { project_id } => project_id,
        }
    }
}

/// Opens a [`FirestoreClient`] per seeding run.
#[derive(Clone)]
pub struct FirestoreConnector {
    credentials: Credentials,
    options: FirestoreClientOptions,
}

impl FirestoreConnector {
    pub fn new(credentials: Credentials, options: FirestoreClientOptions) -> Self {
        Self {
            credentials,
            options,
        }
    }
}

#[async_trait]
impl StoreConnector for FirestoreConnector {
    type Store = FirestoreClient;

    async fn open(&self) -> Result<Self::Store, StoreError> {
        FirestoreClient::initialise(self.credentials.clone(), self.options.clone()).await
    }

    async fn close(&self, store: Option<Self::Store>) {
        // Dropping the client tears down its channel.
        let opened = store.is_some();
        drop(store);
        tracing::debug!(host = %self.options.host_url, opened, "Closed Firestore connection");
    }
}
