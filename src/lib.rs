//! # Approvals seeder
//!
//! Seeds a document collection with sample approval requests.
//!
//! - The [`Catalog`] holds the templates to write, validated up front.
//! - The [`Seeder`] writes them one by one through a [`DocumentStore`],
//!   carrying on past individual failures and collecting a [`SeedReport`].
//! - The [`firestore`] module provides the Firestore backed store; the
//!   [`store::memory`] module an in-process one.
//! - The [`cli`] module is the `approvals-seeder` command line.
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use approvals_seeder::{store::memory::InMemoryConnector, Catalog, Seeder};
//!
//! let connector = InMemoryConnector::default();
//! let report = Seeder::default().run(&Catalog::sample()?, &connector).await?;
//!
//! assert_eq!(report.succeeded(), 15);
//! assert_eq!(connector.store().len().await, 15);
//! # Ok(())
//! # }
//! ```
//!
//! [`DocumentStore`]: store::DocumentStore

pub mod approval;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod firestore;
pub mod report;
pub mod seeder;
mod service_account;
pub mod store;

pub use approval::{ApprovalRequest, ApprovalStatus, Decision, Timestamp};
pub use catalog::Catalog;
pub use report::{SeedOutcome, SeedReport};
pub use seeder::{Seeder, DEFAULT_COLLECTION};
pub use service_account::ServiceAccount;
