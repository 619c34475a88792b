//! Generic resource client
//!
//! One implementation of create / list / get / filter / update / delete,
//! shared by every resource kind. Each operation validates its inputs, makes
//! exactly one request, runs the response validator and only then decodes.

use super::filter::ResourceFilter;
use super::kind::{Resource, Updatable};
use crate::api::client::Client;
use crate::api::error::Result;
use crate::api::http::{check_response, RawResponse};
use crate::api::identifier;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Client for one resource kind.
///
/// Created via [`Client::resources`] or one of the per-kind shortcuts such
/// as [`Client::datalakes`].
pub struct ResourceClient<'a, K> {
    client: &'a Client,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for ResourceClient<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for ResourceClient<'_, K> {}

impl<K: Resource> fmt::Debug for ResourceClient<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("collection", &K::COLLECTION)
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

impl<'a, K: Resource> ResourceClient<'a, K> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// Create a resource. The server assigns id, status and timestamps.
    #[tracing::instrument(skip_all, fields(kind = K::KIND))]
    pub async fn create(&self, request: &K::Create) -> Result<K> {
        K::validate_create(request)?;

        let url = self.client.collection_url(K::COLLECTION);
        let created: K = self.send(Method::POST, &url, Some(request)).await?;

        tracing::info!("Created {} {}", K::KIND, created.id());
        Ok(created)
    }

    /// List every resource visible to the caller. Order is server-defined.
    #[tracing::instrument(skip_all, fields(kind = K::KIND))]
    pub async fn list(&self) -> Result<Vec<K>> {
        let url = self.client.collection_url(K::COLLECTION);
        let items: Vec<K> = self.send(Method::GET, &url, None::<&()>).await?;

        tracing::debug!("Listed {} {} resources", items.len(), K::KIND);
        Ok(items)
    }

    /// Fetch one resource by id.
    #[tracing::instrument(skip(self), fields(kind = K::KIND))]
    pub async fn get(&self, id: &str) -> Result<K> {
        identifier::validate(id)?;

        let url = self.client.item_url(K::COLLECTION, id);
        self.send(Method::GET, &url, None::<&()>).await
    }

    /// Delete one resource. Not idempotent: deleting an absent resource
    /// surfaces the server's error.
    #[tracing::instrument(skip(self), fields(kind = K::KIND))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        identifier::validate(id)?;

        let url = self.client.item_url(K::COLLECTION, id);
        let raw = self
            .client
            .http()
            .execute(Method::DELETE, &url, None::<&()>)
            .await?;
        check_response(raw).await?;

        tracing::info!("Deleted {} {}", K::KIND, id);
        Ok(())
    }

    /// Look up a single resource through a collection filter.
    pub(crate) async fn find_one(&self, filter: &ResourceFilter) -> Result<K> {
        self.get_filtered(filter).await
    }

    /// List resources matching a collection filter.
    pub(crate) async fn filter(&self, filter: &ResourceFilter) -> Result<Vec<K>> {
        let items: Vec<K> = self.get_filtered(filter).await?;

        tracing::debug!(
            "{} {} resources match {}",
            items.len(),
            K::KIND,
            filter.param
        );
        Ok(items)
    }

    #[tracing::instrument(skip(self), fields(kind = K::KIND))]
    async fn get_filtered<T: DeserializeOwned>(&self, filter: &ResourceFilter) -> Result<T> {
        filter.validate()?;

        let url = self
            .client
            .query_url(K::COLLECTION, filter.param, &filter.value);
        self.send(Method::GET, &url, None::<&()>).await
    }

    /// POST to an action below an item, e.g. `/<collection>/<id>/<action>`.
    /// `id` must already be validated.
    pub(crate) async fn post_action<B, T>(&self, id: &str, action: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.client.item_url(K::COLLECTION, id), action);
        self.send(Method::POST, &url, Some(body)).await
    }

    /// Execute, validate, then decode.
    async fn send<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let raw: RawResponse = self.client.http().execute(method, url, body).await?;
        check_response(raw).await?.json().await
    }
}

impl<'a, K: Updatable> ResourceClient<'a, K> {
    /// Partially update a resource. Only fields present in `request` change;
    /// status is never touched.
    #[tracing::instrument(skip(self, request), fields(kind = K::KIND))]
    pub async fn update(&self, id: &str, request: &K::Update) -> Result<K> {
        identifier::validate(id)?;

        let url = self.client.item_url(K::COLLECTION, id);
        let updated: K = self.send(Method::PATCH, &url, Some(request)).await?;

        tracing::info!("Updated {} {}", K::KIND, id);
        Ok(updated)
    }
}
