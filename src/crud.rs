use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, TransportError};
use crate::model::Entity;
use crate::schema::RequestOptions;

const TOTAL_COUNT_HEADER: &str = "x-total-count";
const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// Outcome of a lookup by identifier.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<E> {
    Found(E),
    NotFound,
}

impl<E> Lookup<E> {
    pub fn into_option(self) -> Option<E> {
        match self {
            Lookup::Found(e) => Some(e),
            Lookup::NotFound => None,
        }
    }
}

/// One page of a list request.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    /// Value of the `X-Total-Count` header, when the API sent one.
    pub total_count: Option<u64>,
}

/// CRUD operations for one entity kind.
///
/// Every call resolves exactly once, with a value or an error.
#[async_trait]
pub trait EntityService<E: Entity>: Send + Sync {
    async fn create(&self, entity: &E) -> ClientResult<E>;

    /// Full replacement. The entity must already have an id.
    async fn update(&self, entity: &E) -> ClientResult<E>;

    /// Sends only the fields that are set. The entity must already have an id.
    async fn partial_update(&self, entity: &E) -> ClientResult<E>;

    async fn find(&self, id: i64) -> ClientResult<Lookup<E>>;

    async fn query(&self, options: &RequestOptions) -> ClientResult<Page<E>>;

    async fn count(&self, options: &RequestOptions) -> ClientResult<u64>;

    async fn delete(&self, id: i64) -> ClientResult<()>;
}

#[async_trait]
impl<'a, E, S> EntityService<E> for &'a S
where
    E: Entity,
    S: EntityService<E> + ?Sized,
{
    async fn create(&self, entity: &E) -> ClientResult<E> {
        (**self).create(entity).await
    }

    async fn update(&self, entity: &E) -> ClientResult<E> {
        (**self).update(entity).await
    }

    async fn partial_update(&self, entity: &E) -> ClientResult<E> {
        (**self).partial_update(entity).await
    }

    async fn find(&self, id: i64) -> ClientResult<Lookup<E>> {
        (**self).find(id).await
    }

    async fn query(&self, options: &RequestOptions) -> ClientResult<Page<E>> {
        (**self).query(options).await
    }

    async fn count(&self, options: &RequestOptions) -> ClientResult<u64> {
        (**self).count(options).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        (**self).delete(id).await
    }
}

/// Shared HTTP plumbing: base URL, optional bearer token and the pooled
/// [`reqwest::Client`]. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuses an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Typed access client for one entity kind sharing this connection pool.
    pub fn entity<E: Entity>(&self) -> EntityClient<E> {
        EntityClient::new(self.clone())
    }
}

/// REST access client for entity kind `E`, rooted at `E::RESOURCE`.
#[derive(Clone, Debug)]
pub struct EntityClient<E> {
    api: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityClient<E> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", E::RESOURCE, id)
    }

    fn require_id(entity: &E) -> ClientResult<i64> {
        entity
            .id()
            .ok_or(ClientError::MissingIdentifier { entity: E::NAME })
    }
}

#[async_trait]
impl<E: Entity> EntityService<E> for EntityClient<E> {
    async fn create(&self, entity: &E) -> ClientResult<E> {
        tracing::debug!(entity = E::NAME, "REST request to save");
        let response = self
            .api
            .request(Method::POST, E::RESOURCE)
            .json(entity)
            .send()
            .await?;
        Ok(parse_body(response).await?)
    }

    async fn update(&self, entity: &E) -> ClientResult<E> {
        let id = Self::require_id(entity)?;
        tracing::debug!(entity = E::NAME, id, "REST request to update");
        let response = self
            .api
            .request(Method::PUT, &Self::item_path(id))
            .json(entity)
            .send()
            .await?;
        Ok(parse_body(response).await?)
    }

    async fn partial_update(&self, entity: &E) -> ClientResult<E> {
        let id = Self::require_id(entity)?;
        tracing::debug!(entity = E::NAME, id, "REST request to partially update");
        let body = serde_json::to_vec(entity).map_err(TransportError::Encode)?;
        let response = self
            .api
            .request(Method::PATCH, &Self::item_path(id))
            .header(header::CONTENT_TYPE, MERGE_PATCH_JSON)
            .body(body)
            .send()
            .await?;
        Ok(parse_body(response).await?)
    }

    async fn find(&self, id: i64) -> ClientResult<Lookup<E>> {
        tracing::debug!(entity = E::NAME, id, "REST request to get");
        let response = self
            .api
            .request(Method::GET, &Self::item_path(id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Lookup::NotFound);
        }
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(TransportError::Request)?;
        let body: Option<E> = decode_optional(&bytes)?;

        Ok(match body {
            Some(entity) => Lookup::Found(entity),
            None => Lookup::NotFound,
        })
    }

    async fn query(&self, options: &RequestOptions) -> ClientResult<Page<E>> {
        tracing::debug!(entity = E::NAME, ?options, "REST request to get list");
        let response = self
            .api
            .request(Method::GET, E::RESOURCE)
            .query(&options.to_query_pairs())
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let total_count = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let bytes = response.bytes().await.map_err(TransportError::Request)?;
        let items: Option<Vec<E>> = decode_optional(&bytes)?;

        Ok(Page {
            items: items.unwrap_or_default(),
            total_count,
        })
    }

    async fn count(&self, options: &RequestOptions) -> ClientResult<u64> {
        tracing::debug!(entity = E::NAME, ?options, "REST request to count");
        let response = self
            .api
            .request(Method::GET, &format!("{}/count", E::RESOURCE))
            .query(&options.to_query_pairs())
            .send()
            .await?;
        Ok(parse_body(response).await?)
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        tracing::debug!(entity = E::NAME, id, "REST request to delete");
        let response = self
            .api
            .request(Method::DELETE, &Self::item_path(id))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Returns the response unchanged on 2xx, or a [`TransportError::Status`]
/// carrying the status and body text.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::warn!(status = status.as_u16(), "API request failed");
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// An empty or whitespace-only body, or JSON `null`, decodes to `None`.
fn decode_optional<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
) -> Result<Option<T>, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice(bytes)?)
}

pub(crate) async fn parse_body<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, TransportError> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
