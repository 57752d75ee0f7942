use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

const CSRF_COOKIE_NAME: &str = "csrftoken";
const CSRF_HEADER_NAME: &str = "X-CSRFToken";
const CSRF_BOOTSTRAP_PATH: &str = "/api/csrf/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    Status { status: u16, payload: Value },
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Most specific message the backend offered, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Status { payload, .. } => ["detail", "message", "error"]
                .iter()
                .find_map(|key| payload.get(key).and_then(Value::as_str))
                .map(str::to_string)
                .or_else(|| payload.as_str().map(str::to_string)),
            _ => None,
        }
    }
}

/// Credentialed HTTP client for the LosToys backend. Session and CSRF
/// cookies live in a shared jar; mutating verbs bootstrap the CSRF token
/// once and attach it as a header.
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    base_url: Url,
    csrf_bootstrap: Mutex<()>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        let jar = Arc::new(Jar::default());
        let http = Client::builder().cookie_provider(jar.clone()).build()?;
        Ok(ApiClient {
            http,
            jar,
            base_url,
            csrf_bootstrap: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).await?;
        Self::finish(builder).await
    }

    /// Fetch-or-absent: a 404 on a singleton resource means "not there yet",
    /// not a failure.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        Self::absent_on_404(self.get(path).await)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).await?;
        Self::finish(builder.json(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PATCH, path).await?;
        Self::finish(builder.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path).await?;
        Self::finish(builder).await
    }

    /// Pre-built multipart bodies pass through untouched.
    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).await?;
        Self::finish(builder.multipart(form)).await
    }

    pub fn absent_on_404<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path);
        debug!(%method, %url, "api request");
        let mut builder = self.http.request(method.clone(), url);
        let read_only = [Method::GET, Method::HEAD, Method::OPTIONS, Method::TRACE];
        if !read_only.contains(&method) {
            if let Some(token) = self.ensure_csrf_token().await? {
                builder = builder.header(CSRF_HEADER_NAME, token);
            }
        }
        Ok(builder)
    }

    async fn finish<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let payload: Value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), "api error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                payload,
            });
        }

        Ok(serde_json::from_value(payload)?)
    }

    /// Reads the CSRF cookie from the jar; if absent, hits the bootstrap
    /// endpoint. The mutex is held across the bootstrap await so concurrent
    /// callers share a single round trip.
    async fn ensure_csrf_token(&self) -> Result<Option<String>, ApiError> {
        if let Some(token) = self.csrf_cookie() {
            return Ok(Some(token));
        }

        let _guard = self.csrf_bootstrap.lock().await;
        if let Some(token) = self.csrf_cookie() {
            return Ok(Some(token));
        }

        debug!("bootstrapping csrf token");
        let response = self.http.get(self.endpoint(CSRF_BOOTSTRAP_PATH)).send().await?;
        let payload = response.json::<Value>().await.unwrap_or(Value::Null);
        let token = payload
            .get("csrfToken")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.csrf_cookie());
        Ok(token)
    }

    fn csrf_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let raw = header.to_str().ok()?;
        raw.split(';')
            .map(str::trim)
            .find_map(|pair| pair.strip_prefix(&format!("{CSRF_COOKIE_NAME}=")).map(str::to_string))
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
