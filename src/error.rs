use std::path::PathBuf;

use firestore_grpc::tonic;

use crate::approval::InvalidApproval;

/// Errors raised by a [`DocumentStore`](crate::store::DocumentStore) or while
/// acquiring one.
#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    DocumentAlreadyExists(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("grpc: {}", .0.message())]
    Status(#[from] tonic::Status),

    #[error("grpc transport: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single catalog entry that the store refused or failed to persist.
#[derive(thiserror::Error)]
#[error("failed to add '{item_name}': {source}")]
pub struct RecordWriteError {
    pub item_name: String,
    #[source]
    pub source: StoreError,
}

/// The only error that escapes a seeding run. Per-record failures end up in
/// the [`SeedReport`](crate::report::SeedReport) instead.
#[derive(thiserror::Error)]
pub enum SeedError {
    #[error("could not open the document store")]
    StoreConnection(#[source] StoreError),
}

#[derive(thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog entry {index} ('{item_name}') is invalid: {reason}")]
    InvalidEntry {
        index: usize,
        item_name: String,
        reason: InvalidApproval,
    },
}

macro_rules! debug_with_error_chain {
    ($($error:ty),+ $(,)?) => {
        $(
            impl std::fmt::Debug for $error {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    error_chain_fmt(self, f)
                }
            }
        )+
    };
}

debug_with_error_chain!(StoreError, RecordWriteError, SeedError, CatalogError);

// Taken from https://www.lpalmieri.com/posts/error-handling-rust/#internal-errors
fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
