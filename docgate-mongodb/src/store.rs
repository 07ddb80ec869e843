//! MongoDB-backed document store.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection};
use serde_json::Value;

use docgate_core::backend::{DeleteOutcome, DocumentBackend, WriteOutcome};
use docgate_core::conform::{ConformedQuery, Filter};
use docgate_core::error::{GatewayError, GatewayResult};

use crate::codec::{id_filter, restore_document, to_document};
use crate::translate::{filter_to_document, projection_to_document, sort_to_document};

/// Document store backed by a MongoDB database.
///
/// One `Client` serves all collections; the driver maintains its own
/// connection pool, so the store is cheap to share.
#[derive(Debug)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    /// Parses the connection string and builds a connected store.
    pub async fn connect(dsn: &str, database: &str) -> GatewayResult<Self> {
        let options = ClientOptions::parse(dsn)
            .await
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;
        let client = Client::with_options(options)
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;

        Ok(Self::new(client, database.to_string()))
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.client.database(&self.database).collection(name)
    }

    /// Strips the immutable identifier out of a patch before `$set`.
    fn prepare_patch(patch: &Value) -> GatewayResult<Document> {
        let mut fields = to_document(patch)?;
        fields.remove("_id");
        Ok(fields)
    }
}

/// The driver takes a signed limit, and negative values mean something else
/// entirely (single-batch mode), so an oversized page size clamps instead
/// of wrapping.
fn clamp_limit(limit: u64) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl DocumentBackend for MongoStore {
    async fn insert_one(&self, collection: &str, document: Value) -> GatewayResult<Value> {
        let mut prepared = to_document(&document)?;
        if !prepared.contains_key("_id") {
            prepared.insert("_id", ObjectId::new());
        }

        self.collection(collection)
            .insert_one(prepared.clone())
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?;

        Ok(restore_document(&prepared))
    }

    async fn find(&self, collection: &str, query: &ConformedQuery) -> GatewayResult<Vec<Value>> {
        let mut options = FindOptions::default();
        options.limit = Some(clamp_limit(query.limit));
        options.skip = Some(query.offset());
        if let Some(spec) = query.sort.as_deref() {
            options.sort = Some(sort_to_document(spec));
        }
        if let Some(spec) = query.projection.as_deref() {
            options.projection = Some(projection_to_document(spec));
        }

        Ok(self
            .collection(collection)
            .find(filter_to_document(&query.filter))
            .with_options(options)
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?
            .iter()
            .map(restore_document)
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
        self.collection(collection)
            .count_documents(filter_to_document(filter))
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        projection: Option<&str>,
    ) -> GatewayResult<Option<Value>> {
        let collection = self.collection(collection);
        let mut find = collection.find_one(id_filter(id));
        if let Some(spec) = projection {
            find = find.projection(projection_to_document(spec));
        }

        Ok(find
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?
            .map(|doc| restore_document(&doc)))
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Value,
    ) -> GatewayResult<WriteOutcome> {
        let result = self
            .collection(collection)
            .update_many(
                filter_to_document(filter),
                doc! { "$set": Self::prepare_patch(&patch)? },
            )
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?;

        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> GatewayResult<Option<Value>> {
        // find_one_and_update returns the pre-update document by default,
        // which is exactly the contract here.
        Ok(self
            .collection(collection)
            .find_one_and_update(
                id_filter(id),
                doc! { "$set": Self::prepare_patch(&patch)? },
            )
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?
            .map(|doc| restore_document(&doc)))
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> GatewayResult<DeleteOutcome> {
        let result = self
            .collection(collection)
            .delete_many(filter_to_document(filter))
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?;

        Ok(DeleteOutcome {
            deleted: result.deleted_count,
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> GatewayResult<Option<Value>> {
        Ok(self
            .collection(collection)
            .find_one_and_delete(id_filter(id))
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?
            .map(|doc| restore_document(&doc)))
    }
}
