use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    multipart::Form,
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::error_detail::extract_error_detail;

#[derive(Clone)]
pub struct PortalApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl PortalApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.api_token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("API token contains invalid header characters, sending unauthenticated"),
            }
        }

        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("Making {} request to {}", method, url);
        self.client.request(method, url).headers(self.get_headers())
    }

    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .builder(Method::GET, path)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        Self::decode(response).await
    }

    /// GET a collection that may be returned bare or inside a paginated `results` envelope.
    pub async fn get_list<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let envelope: ListEnvelope<T> = self.get_json(path, query).await?;
        Ok(envelope.into_items())
    }

    pub async fn post_multipart<T>(&self, path: &str, form: Form) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .builder(Method::POST, path)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        Self::decode(response).await
    }

    async fn decode<T>(response: Response) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, body);
            return Err(AppError::from_status(status, extract_error_detail(status, &body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Decode(format!("Unexpected response body: {}", e)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListEnvelope<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Plain(items) => items,
            ListEnvelope::Paginated { results } => results,
        }
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Network(format!("Request timed out: {}", e))
    } else {
        AppError::Network(e.to_string())
    }
}
