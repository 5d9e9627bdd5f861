use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, oid::ObjectId, Bson, Document},
    options::IndexOptions,
    Client, ClientSession, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::Config,
    error::{Error, Result},
};

/// A document type stored in its own collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Unpin + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Upper-case entity name used in error codes (`ACTION_NOT_FOUND`).
    const NAME: &'static str;
    const ORDER: SortKey;

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: ObjectId);

    fn id_hex(&self) -> String {
        self.id().map(|id| id.to_hex()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub descending: bool,
}

impl SortKey {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            descending: false,
        }
    }
    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

/// Sorts on `key`, putting documents whose key is null or missing last.
pub fn sorted_pipeline(key: SortKey) -> Vec<Document> {
    let direction = if key.descending { -1 } else { 1 };
    let mut sort = Document::new();
    sort.insert("_missing", 1);
    sort.insert(key.field, direction);
    if key.field != "_id" {
        sort.insert("_id", direction);
    }

    vec![
        doc! {
            "$addFields": {
                "_missing": {
                    "$cond": [
                        { "$in": [ { "$type": format!("${}", key.field) }, ["missing", "null"] ] },
                        1,
                        0
                    ]
                }
            }
        },
        doc! { "$sort": sort },
        doc! { "$project": { "_missing": 0 } },
    ]
}

#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
}

/// An open client session with a started transaction.
pub struct Transaction {
    session: ClientSession,
}

impl Transaction {
    pub fn session(&mut self) -> &mut ClientSession {
        &mut self.session
    }

    /// Commits when `outcome` is `Ok`, aborts otherwise, and hands `outcome` back.
    pub async fn finish<T>(mut self, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.session.commit_transaction().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(abort) = self.session.abort_transaction().await {
                    tracing::warn!(error = %abort, "transaction abort failed");
                }
                Err(error)
            }
        }
    }
}

impl Database {
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Client::with_uri_str(&config.mongodb_uri).await?;
        Ok(Self::new(client, &config.database))
    }

    pub fn new(client: Client, name: &str) -> Self {
        let db = client.database(name);
        Self { client, db }
    }

    pub fn collection<T: Record>(&self) -> Collection<T> {
        self.db.collection::<T>(T::COLLECTION)
    }

    pub fn documents(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    pub async fn begin(&self) -> Result<Transaction> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;
        Ok(Transaction { session })
    }

    /// Creates missing collections and indexes. Collections must exist before
    /// they are written to inside a transaction.
    pub async fn ensure_collections(&self, names: &[&str]) -> Result<()> {
        let existing = self.db.list_collection_names(None).await?;
        for name in names {
            if !existing.iter().any(|collection| collection == name) {
                self.db.create_collection(*name, None).await?;
                tracing::info!(collection = *name, "created collection");
            }
        }
        Ok(())
    }

    pub async fn ensure_index(&self, collection: &str, keys: Document, unique: bool) -> Result<()> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(unique).build())
            .build();
        self.documents(collection).create_index(index, None).await?;
        Ok(())
    }

    pub async fn drop_database(&self) -> Result<()> {
        self.db.drop(None).await?;
        Ok(())
    }

    pub async fn find_many<T: Record>(&self) -> Result<Vec<T>> {
        let mut cursor = self
            .collection::<T>()
            .aggregate(sorted_pipeline(T::ORDER), None)
            .await?;
        let mut records: Vec<T> = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            records.push(from_document::<T>(doc)?);
        }
        Ok(records)
    }

    pub async fn find_by_id<T: Record>(&self, _id: &ObjectId) -> Result<Option<T>> {
        Ok(self
            .collection::<T>()
            .find_one(doc! { "_id": _id }, None)
            .await?)
    }

    pub async fn get<T: Record>(&self, _id: &ObjectId) -> Result<T> {
        self.find_by_id::<T>(_id)
            .await?
            .ok_or(Error::NotFound(T::NAME))
    }

    pub async fn count(&self, collection: &str, filter: Document) -> Result<u64> {
        Ok(self.documents(collection).count_documents(filter, None).await?)
    }

    pub async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        let cursor = self.documents(collection).aggregate(pipeline, None).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Increments `field` on the record, returning whether it exists. The write
    /// makes concurrent transactions that delete the record conflict.
    pub async fn touch_with_session<T: Record>(
        &self,
        _id: &ObjectId,
        field: &str,
        session: &mut ClientSession,
    ) -> Result<bool> {
        let mut increment = Document::new();
        increment.insert(field, 1);
        let result = self
            .collection::<T>()
            .update_one_with_session(doc! { "_id": _id }, doc! { "$inc": increment }, None, session)
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn insert_with_session<T: Record>(
        &self,
        record: &T,
        session: &mut ClientSession,
    ) -> Result<()> {
        self.collection::<T>()
            .insert_one_with_session(record, None, session)
            .await?;
        Ok(())
    }

    pub async fn replace_with_session<T: Record>(
        &self,
        record: &T,
        session: &mut ClientSession,
    ) -> Result<()> {
        let _id = record.id().ok_or(Error::NotFound(T::NAME))?;
        let result = self
            .collection::<T>()
            .replace_one_with_session(doc! { "_id": _id }, record, None, session)
            .await?;
        if result.matched_count == 0 {
            return Err(Error::NotFound(T::NAME));
        }
        Ok(())
    }

    pub async fn delete_with_session<T: Record>(
        &self,
        _id: &ObjectId,
        session: &mut ClientSession,
    ) -> Result<()> {
        let result = self
            .collection::<T>()
            .delete_one_with_session(doc! { "_id": _id }, None, session)
            .await?;
        if result.deleted_count == 0 {
            return Err(Error::NotFound(T::NAME));
        }
        Ok(())
    }

    /// Assigns a fresh id and inserts the record in its own transaction.
    pub async fn insert<T: Record>(&self, record: &mut T) -> Result<ObjectId> {
        let _id = ObjectId::new();
        record.set_id(_id);

        let mut tx = self.begin().await?;
        let outcome = self.insert_with_session(&*record, tx.session()).await;
        tx.finish(outcome).await?;

        tracing::info!(collection = T::COLLECTION, id = %_id, "inserted");
        Ok(_id)
    }

    pub async fn replace<T: Record>(&self, record: &T) -> Result<()> {
        let mut tx = self.begin().await?;
        let outcome = self.replace_with_session(record, tx.session()).await;
        tx.finish(outcome).await?;

        tracing::info!(collection = T::COLLECTION, id = %record.id_hex(), "updated");
        Ok(())
    }

    pub async fn delete<T: Record>(&self, _id: &ObjectId) -> Result<()> {
        let mut tx = self.begin().await?;
        let outcome = self.delete_with_session::<T>(_id, tx.session()).await;
        tx.finish(outcome).await?;

        tracing::info!(collection = T::COLLECTION, id = %_id, "deleted");
        Ok(())
    }
}

/// Reads a numeric aggregation result regardless of its BSON width.
pub fn bson_number(value: Option<&Bson>) -> f64 {
    match value {
        Some(Bson::Int32(n)) => f64::from(*n),
        Some(Bson::Int64(n)) => *n as f64,
        Some(Bson::Double(n)) => *n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_pipeline_puts_missing_last() {
        let pipeline = sorted_pipeline(SortKey::asc("due_date"));
        assert_eq!(pipeline.len(), 3);

        let sort = pipeline[1].get_document("$sort").unwrap();
        let keys: Vec<&String> = sort.keys().collect();
        assert_eq!(keys, ["_missing", "due_date", "_id"]);
        assert_eq!(sort.get_i32("_missing").unwrap(), 1);
        assert_eq!(sort.get_i32("due_date").unwrap(), 1);
    }

    #[test]
    fn descending_sort_on_id_has_no_tiebreak() {
        let pipeline = sorted_pipeline(SortKey::desc("_id"));
        let sort = pipeline[1].get_document("$sort").unwrap();
        assert_eq!(sort.len(), 2);
        assert_eq!(sort.get_i32("_id").unwrap(), -1);
    }

    #[test]
    fn reads_any_numeric_width() {
        assert_eq!(bson_number(Some(&Bson::Int32(3))), 3.0);
        assert_eq!(bson_number(Some(&Bson::Int64(4))), 4.0);
        assert_eq!(bson_number(Some(&Bson::Double(15.5))), 15.5);
        assert_eq!(bson_number(Some(&Bson::Null)), 0.0);
        assert_eq!(bson_number(None), 0.0);
    }
}
