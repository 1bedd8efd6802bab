// src/core/repository.rs
//! Generic CRUD access to one REST resource

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use super::http_client::{ApiError, HttpClient, RequestOptions};
use crate::types::{Paginated, PaginationParams};

pub struct Repository<T> {
    client: Arc<HttpClient>,
    endpoint: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            endpoint: self.endpoint.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(client: Arc<HttpClient>, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    /// One page of the resource. `extra` is appended after the normalized
    /// `PageNumber`/`PageSize` pair.
    pub async fn find_all(
        &self,
        params: PaginationParams,
        extra: Vec<(String, String)>,
    ) -> Result<Paginated<T>, ApiError> {
        let params = params.normalized();
        let mut query = params.to_query();
        query.extend(extra);

        let value: Value = self
            .client
            .get(&self.endpoint, RequestOptions::with_query(query))
            .await?;

        Paginated::from_value(&value, params).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<T, ApiError> {
        let value: Value = self
            .client
            .get(&self.item_path(id), RequestOptions::default())
            .await?;
        unwrap_entity(value)
    }

    pub async fn create(&self, entity: &T) -> Result<T, ApiError> {
        let value: Value = self
            .client
            .post(&self.endpoint, entity, RequestOptions::default())
            .await?;
        unwrap_entity(value)
    }

    pub async fn update(&self, id: &str, entity: &T) -> Result<T, ApiError> {
        let value: Value = self
            .client
            .put(&self.item_path(id), entity, RequestOptions::default())
            .await?;
        unwrap_entity(value)
    }

    pub async fn patch(&self, id: &str, changes: &Value) -> Result<T, ApiError> {
        let value: Value = self
            .client
            .patch(&self.item_path(id), changes, RequestOptions::default())
            .await?;
        unwrap_entity(value)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self
            .client
            .delete(&self.item_path(id), RequestOptions::default())
            .await?;
        Ok(())
    }
}

/// Entities sometimes come back wrapped as `{ data: {...} }`
fn unwrap_entity<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let entity = match value {
        Value::Object(mut map) if map.len() <= 3 && map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(entity).map_err(|e| ApiError::Decode(e.to_string()))
}
