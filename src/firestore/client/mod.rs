use std::fmt::Display;

use anyhow::Context;
use async_trait::async_trait;
use firestore_grpc::tonic;
use firestore_grpc::v1::firestore_client::FirestoreClient as GrpcFirestoreClient;
use firestore_grpc::v1::run_query_request::QueryType;
use firestore_grpc::v1::{CommitRequest, RunQueryRequest};
use firestore_grpc::tonic::{
    codegen::InterceptedService, metadata::MetadataValue, transport::Channel, Request, Status,
};

use crate::error::StoreError;
use crate::store::{
    ApprovalLookup, CollectionReference, DocumentReference, DocumentStore, Record, RequestedItem,
};

use super::encode::{create_document_write, string_field};
use super::query::{structured_query, EqualTo};
use super::token_provider::FirestoreTokenProvider;
use super::Credentials;

mod options;

pub use options::FirestoreClientOptions;

type InterceptorFunction = Box<dyn FnMut(Request<()>) -> Result<Request<()>, Status> + Send>;

/// An authenticated connection to one Firestore database.
pub struct FirestoreClient {
    client: GrpcFirestoreClient<InterceptedService<Channel, InterceptorFunction>>,
    database_path: String,
    root_resource_path: String,
}

fn create_auth_interceptor(mut token_provider: FirestoreTokenProvider) -> InterceptorFunction {
    Box::new(move |mut req: Request<()>| {
        let token = token_provider
            .get_token()
            .map_err(|_| Status::unauthenticated("Could not get token from token provider"))?;

        let bearer_token = format!("Bearer {token}");
        let mut header_value = MetadataValue::from_str(&bearer_token).map_err(|_| {
            Status::unauthenticated("Failed to construct metadata value for authorization token")
        })?;
        header_value.set_sensitive(true);

        req.metadata_mut().insert("authorization", header_value);

        Ok(req)
    })
}

impl FirestoreClient {
    /// Connects to the Firestore instance described by `options`.
    #[tracing::instrument(
        name = "Connect to Firestore",
        skip_all,
        fields(host = %options.host_url, project = %credentials.project_id())
    )]
    pub async fn initialise(
        credentials: Credentials,
        options: FirestoreClientOptions,
    ) -> Result<Self, StoreError> {
        let channel = Channel::from_shared(options.host_url.clone())
            .context("Failed to create gRPC channel")?
            .connect()
            .await?;

        let database_path = format!(
            "projects/{}/databases/{}",
            credentials.project_id(),
            options.database_id
        );
        let root_resource_path = format!("{database_path}/documents");

        let service = GrpcFirestoreClient::with_interceptor(
            channel,
            create_auth_interceptor(FirestoreTokenProvider::new(credentials)),
        );

        tracing::debug!(database = %database_path, "Connected to Firestore");

        Ok(Self {
            client: service,
            database_path,
            root_resource_path,
        })
    }

    /// Creates a document with a generated ID in the given collection and
    /// returns that ID.
    pub async fn create_document(
        &mut self,
        collection_ref: &CollectionReference,
        record: &Record,
    ) -> Result<String, StoreError> {
        self.create_document_at_ref(&collection_ref.auto_doc(), record)
            .await
    }

    /// Creates a document at the given reference. Fails with
    /// [`StoreError::DocumentAlreadyExists`] rather than overwriting.
    pub async fn create_document_at_ref(
        &mut self,
        doc_ref: &DocumentReference,
        record: &Record,
    ) -> Result<String, StoreError> {
        let request = CommitRequest {
            database: self.database_path.clone(),
            writes: vec![create_document_write(self.get_name_with(doc_ref), record)],
            ..Default::default()
        };

        self.client
            .commit(request)
            .await
            .map_err(map_status)?;

        Ok(doc_ref.id().to_string())
    }

    pub(crate) fn get_name_with(&self, item: impl Display) -> String {
        format!("{}/{}", self.root_resource_path, item)
    }

    fn split_collection_parent_and_name(
        &self,
        collection: &CollectionReference,
    ) -> (String, String) {
        let parent = collection
            .parent()
            .map(|p| self.get_name_with(p))
            .unwrap_or_else(|| self.root_resource_path.clone());
        let name = collection.name().to_string();

        (parent, name)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn add_document(
        &mut self,
        collection: &CollectionReference,
        record: &Record,
    ) -> Result<String, StoreError> {
        self.create_document(collection, record).await
    }
}

#[async_trait]
impl ApprovalLookup for FirestoreClient {
    async fn approvals_requested_by(
        &mut self,
        collection: &CollectionReference,
        requested_by: &str,
    ) -> Result<Vec<RequestedItem>, StoreError> {
        let (parent, collection_id) = self.split_collection_parent_and_name(collection);
        let request = RunQueryRequest {
            parent,
            query_type: Some(QueryType::StructuredQuery(structured_query(
                &collection_id,
                EqualTo::new("requestedBy", requested_by),
            ))),
            consistency_selector: None,
        };

        let mut stream = self
            .client
            .run_query(request)
            .await
            .map_err(map_status)?
            .into_inner();

        let mut items = Vec::new();
        // Some responses only report query progress and carry no document.
        while let Some(response) = stream.message().await.map_err(map_status)? {
            let Some(document) = response.document else {
                continue;
            };
            match (
                string_field(&document, "itemName"),
                string_field(&document, "status"),
            ) {
                (Some(item_name), Some(status)) => items.push(RequestedItem {
                    item_name: item_name.to_string(),
                    status: status.to_string(),
                }),
                _ => tracing::debug!(document = %document.name, "Skipping incomplete approval"),
            }
        }

        Ok(items)
    }
}

fn map_status(status: Status) -> StoreError {
    match status.code() {
        tonic::Code::AlreadyExists => {
            StoreError::DocumentAlreadyExists(status.message().to_string())
        }
        tonic::Code::Unauthenticated => StoreError::Unauthenticated(status.message().to_string()),
        _ => StoreError::Status(status),
    }
}
