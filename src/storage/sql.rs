use std::sync::Arc;

use chrono::Utc;
use entities::document;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::{Document, DocumentStore, Fields};
use crate::error::{ReaderError, ReaderResult};

/// [`DocumentStore`] over a sea-orm connection; one `documents` table holds every collection.
#[derive(Clone, Debug)]
pub struct SqlDocumentStore {
    db: Arc<DatabaseConnection>,
}

impl SqlDocumentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find(&self, collection: &str, id: &str) -> Result<Option<document::Model>, sea_orm::DbErr> {
        document::Entity::find_by_id(id.to_string())
            .filter(document::Column::Collection.eq(collection))
            .one(self.db.as_ref())
            .await
    }
}

fn read_err(e: sea_orm::DbErr) -> ReaderError {
    ReaderError::Transport(e.to_string())
}

fn write_err(e: impl std::fmt::Display) -> ReaderError {
    ReaderError::RemoteWrite(e.to_string())
}

fn to_document(model: document::Model) -> ReaderResult<Document> {
    let fields: Fields = serde_json::from_str(&model.fields)?;
    Ok(Document {
        id: model.id,
        collection: model.collection,
        fields,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[async_trait::async_trait]
impl DocumentStore for SqlDocumentStore {
    #[tracing::instrument(level = "debug", skip(self, fields))]
    async fn add_document(&self, collection: &str, fields: Fields) -> ReaderResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let body = serde_json::to_string(&fields).map_err(write_err)?;
        document::ActiveModel {
            id: Set(id.clone()),
            collection: Set(collection.to_string()),
            fields: Set(body),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(write_err)?;
        tracing::debug!(%id, "document added");
        Ok(id)
    }

    #[tracing::instrument(level = "debug", skip(self, fields))]
    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> ReaderResult<()> {
        let model = self
            .find(collection, id)
            .await
            .map_err(write_err)?
            .ok_or_else(|| ReaderError::NotFound(format!("{collection}/{id}")))?;
        let mut merged: Fields = serde_json::from_str(&model.fields)?;
        merged.extend(fields);
        let body = serde_json::to_string(&merged).map_err(write_err)?;

        let mut active: document::ActiveModel = model.into();
        active.fields = Set(body);
        active.updated_at = Set(Utc::now());
        active.update(self.db.as_ref()).await.map_err(write_err)?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_document(&self, collection: &str, id: &str) -> ReaderResult<()> {
        let res = document::Entity::delete_many()
            .filter(document::Column::Id.eq(id))
            .filter(document::Column::Collection.eq(collection))
            .exec(self.db.as_ref())
            .await
            .map_err(write_err)?;
        if res.rows_affected == 0 {
            return Err(ReaderError::NotFound(format!("{collection}/{id}")));
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_document(&self, collection: &str, id: &str) -> ReaderResult<Option<Document>> {
        self.find(collection, id)
            .await
            .map_err(read_err)?
            .map(to_document)
            .transpose()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_documents(&self, collection: &str) -> ReaderResult<Vec<Document>> {
        document::Entity::find()
            .filter(document::Column::Collection.eq(collection))
            .order_by_asc(document::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(read_err)?
            .into_iter()
            .map(to_document)
            .collect()
    }
}
