//! Typed CRUD client over one REST collection

use super::ApiClient;
use crate::core::auth::AccessOperation;
use crate::core::error::{AdminError, AdminResult};
use crate::core::query::QueryDescriptor;
use crate::core::resource::{Resource, ResourceService};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// REST client for resource `T`
///
/// Maps the five CRUD operations onto `/{T::ROUTE}` and `/{T::ROUTE}/{id}`.
pub struct ResourceClient<T> {
    api: ApiClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _marker: PhantomData,
        }
    }

    /// Collection URL, or record URL when `id` is given
    pub fn url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.api.base_url(), T::ROUTE, id),
            None => format!("{}/{}", self.api.base_url(), T::ROUTE),
        }
    }

    fn request(&self, method: Method, id: Option<&str>) -> RequestBuilder {
        let builder = self.api.http().request(method, self.url(id));
        match self.api.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        operation: AccessOperation,
        id: Option<&str>,
    ) -> AdminResult<Response> {
        tracing::debug!(entity = T::ENTITY, operation = %operation, id, "sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(entity = T::ENTITY, operation = %operation, error = %e, "request failed");
            AdminError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|e| {
            tracing::debug!(
                entity = T::ENTITY,
                status = status.as_u16(),
                error = %e,
                "failed to read error body"
            );
            String::new()
        });
        let error = AdminError::from_response(status, T::ENTITY, operation, id, &body);
        tracing::warn!(
            entity = T::ENTITY,
            operation = %operation,
            id,
            status = status.as_u16(),
            error = %error,
            "request rejected"
        );
        Err(error)
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> AdminResult<R> {
        response.json::<R>().await.map_err(|e| AdminError::Server {
            status: None,
            message: format!("undecodable {} response: {}", T::ENTITY, e),
        })
    }
}

#[async_trait]
impl<T: Resource> ResourceService<T> for ResourceClient<T> {
    async fn list(&self, query: &QueryDescriptor) -> AdminResult<Vec<T>> {
        let builder = self
            .request(Method::GET, None)
            .query(&query.to_query_pairs());
        let response = self.send(builder, AccessOperation::Read, None).await?;
        Self::decode(response).await
    }

    async fn get(&self, id: &str) -> AdminResult<T> {
        let builder = self.request(Method::GET, Some(id));
        let response = self.send(builder, AccessOperation::Read, Some(id)).await?;
        Self::decode(response).await
    }

    async fn create(&self, payload: &Value) -> AdminResult<T> {
        let builder = self.request(Method::POST, None).json(payload);
        let response = self.send(builder, AccessOperation::Create, None).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: &str, payload: &Value) -> AdminResult<T> {
        let builder = self.request(Method::PUT, Some(id)).json(payload);
        let response = self
            .send(builder, AccessOperation::Update, Some(id))
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &str) -> AdminResult<()> {
        let builder = self.request(Method::DELETE, Some(id));
        self.send(builder, AccessOperation::Delete, Some(id))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Player, PlayerProfile};

    #[test]
    fn test_urls_use_route_segment() {
        let api = ApiClient::new("http://localhost:3000");
        let profiles: ResourceClient<PlayerProfile> = api.resource();
        assert_eq!(profiles.url(None), "http://localhost:3000/player-profiles");
        assert_eq!(
            profiles.url(Some("abc")),
            "http://localhost:3000/player-profiles/abc"
        );

        let players: ResourceClient<Player> = api.resource();
        assert_eq!(players.url(None), "http://localhost:3000/players");
    }
}
