//! # HTTP Backend Client
//!
//! [`StorefrontApi`] over reqwest.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        One Backend Call                                 │
//! │                                                                         │
//! │  request()                                                              │
//! │  ├── join path onto base URL                                           │
//! │  ├── X-Request-Id: <uuid v4>                                           │
//! │  └── Authorization: Bearer <token>   (when logged in)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  execute()                                                              │
//! │  ├── transport error ──► ClientError::{ConnectionFailed, Timeout, ..}  │
//! │  ├── non-2xx ──────────► ClientError::from_status(status, body)        │
//! │  └── 2xx ──────────────► decode JSON body (or discard it)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use metiz_core::{
    CartItem, OrderConfirmation, OrderRequest, ProductId, RegistrationPayload, Session,
};

use crate::api::StorefrontApi;
use crate::config::ApiSettings;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =============================================================================
// Bearer Token
// =============================================================================

/// Shared slot for the session token.
///
/// The auth container writes it; the HTTP client reads it on every request.
/// The lock is never held across an await.
#[derive(Clone, Default)]
pub struct BearerToken(Arc<RwLock<Option<String>>>);

impl BearerToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token preset from configuration.
    pub fn with_token(token: impl Into<String>) -> Self {
        let handle = Self::new();
        handle.set(token);
        handle
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut slot = self.0.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.into());
    }

    pub fn clear(&self) {
        let mut slot = self.0.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_set(&self) -> bool {
        self.0.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_set() { "<set>" } else { "<unset>" };
        f.debug_tuple("BearerToken").field(&state).finish()
    }
}

// =============================================================================
// Wire Bodies
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddCartItemBody {
    product_id: ProductId,
    quantity: i64,
}

#[derive(Debug, Serialize)]
struct UpdateCartItemBody {
    quantity: i64,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

// =============================================================================
// HTTP Client
// =============================================================================

/// reqwest-backed implementation of [`StorefrontApi`].
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    http: Client,
    base_url: Url,
    token: BearerToken,
}

impl HttpStorefrontApi {
    /// Builds a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the TLS backend
    /// cannot be initialised.
    pub fn new(settings: &ApiSettings, token: BearerToken) -> ClientResult<Self> {
        settings.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let mut base_url = settings.base_url()?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            token,
        })
    }

    /// The token slot this client reads from.
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Starts a request with the correlation id and, when logged in, the
    /// bearer token.
    fn request(&self, method: Method, path: &str) -> ClientResult<(RequestBuilder, Uuid)> {
        let request_id = Uuid::new_v4();
        let mut builder = self
            .http
            .request(method, self.url(path)?)
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }

        Ok((builder, request_id))
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        request_id: Uuid,
        action: &'static str,
    ) -> ClientResult<Response> {
        let started = Instant::now();

        let response = builder.send().await.map_err(|e| {
            warn!(%request_id, action, error = %e, "Backend unreachable");
            ClientError::from(e)
        })?;

        let status = response.status();
        debug!(
            %request_id,
            action,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Backend responded"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            %request_id,
            action,
            status = status.as_u16(),
            body = %body,
            "Backend rejected request"
        );
        Err(ClientError::from_status(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        decode_body(&bytes)
    }
}

/// Decodes a 2xx body. Malformed or out-of-range data (e.g. a cart line with
/// a non-positive quantity) becomes `DeserializationFailed`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(bytes).map_err(|err| {
        warn!(error = %err, "Undecodable backend response");
        ClientError::from(err)
    })
}

/// Turns a registration payload into the multipart body.
fn registration_form(payload: RegistrationPayload) -> ClientResult<Form> {
    let mut form = Form::new();
    for (name, value) in payload.fields {
        form = form.text(name, value);
    }

    if let Some(photo) = payload.photo {
        let part = Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.content_type)?;
        form = form.part("photo", part);
    }

    Ok(form)
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn fetch_cart(&self) -> ClientResult<Vec<CartItem>> {
        let (builder, request_id) = self.request(Method::GET, endpoints::CART)?;
        let response = self.execute(builder, request_id, "fetch_cart").await?;
        Self::decode(response).await
    }

    async fn add_cart_item(&self, product_id: ProductId, quantity: i64) -> ClientResult<CartItem> {
        let (builder, request_id) = self.request(Method::POST, endpoints::CART)?;
        let builder = builder.json(&AddCartItemBody {
            product_id,
            quantity,
        });
        let response = self.execute(builder, request_id, "add_cart_item").await?;
        Self::decode(response).await
    }

    async fn update_cart_item(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> ClientResult<CartItem> {
        let path = endpoints::cart_item(product_id);
        let (builder, request_id) = self.request(Method::PUT, &path)?;
        let builder = builder.json(&UpdateCartItemBody { quantity });
        let response = self.execute(builder, request_id, "update_cart_item").await?;
        Self::decode(response).await
    }

    async fn remove_cart_item(&self, product_id: ProductId) -> ClientResult<()> {
        let path = endpoints::cart_item(product_id);
        let (builder, request_id) = self.request(Method::DELETE, &path)?;
        self.execute(builder, request_id, "remove_cart_item").await?;
        Ok(())
    }

    async fn clear_cart(&self) -> ClientResult<()> {
        let (builder, request_id) = self.request(Method::DELETE, endpoints::CART)?;
        self.execute(builder, request_id, "clear_cart").await?;
        Ok(())
    }

    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderConfirmation> {
        let (builder, request_id) = self.request(Method::POST, endpoints::ORDERS)?;
        let response = self
            .execute(builder.json(order), request_id, "submit_order")
            .await?;
        let confirmation: OrderConfirmation = Self::decode(response).await?;
        info!(%request_id, order_id = %confirmation.id, "Order accepted");
        Ok(confirmation)
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let (builder, request_id) = self.request(Method::POST, endpoints::LOGIN)?;
        let builder = builder.json(&LoginBody { email, password });
        let response = self.execute(builder, request_id, "login").await?;
        Self::decode(response).await
    }

    async fn register(&self, payload: RegistrationPayload) -> ClientResult<()> {
        let path = payload.path();
        let role = payload.role;
        let form = registration_form(payload)?;

        let (builder, request_id) = self.request(Method::POST, path)?;
        self.execute(builder.multipart(form), request_id, "register")
            .await?;
        info!(%request_id, %role, "Account registered");
        Ok(())
    }
}
