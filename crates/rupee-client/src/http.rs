//! HTTP transport for the billing backend

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Thin JSON-over-HTTP client bound to one backend root.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `products/` becomes `{base_url}/products/`.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "PUT");
        let response = self.client.put(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request. The backend answers 204 with no body.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, &text));
        }
        Ok(())
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Backend returned an unexpected body");
            ClientError::Serialization(e)
        })
    }

    fn status_error(status: StatusCode, text: &str) -> ClientError {
        warn!(status = status.as_u16(), "Backend request failed");
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(backend_message(text)),
            StatusCode::BAD_REQUEST => ClientError::Validation(backend_message(text)),
            _ => ClientError::Server {
                status: status.as_u16(),
                message: backend_message(text),
            },
        }
    }
}

/// Pulls a readable message out of an error body.
///
/// Understands `{"error": ...}`, `{"detail": ...}` and field error maps
/// (`{"phone": ["This field is required."]}`); anything else is returned
/// as-is.
pub fn backend_message(text: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => return text.trim().to_string(),
    };

    let Some(object) = value.as_object() else {
        return text.trim().to_string();
    };

    for key in ["error", "detail", "message"] {
        if let Some(message) = object.get(key).and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }

    let fields: Vec<String> = object
        .iter()
        .filter_map(|(field, errors)| {
            let first = match errors {
                serde_json::Value::Array(list) => list.first()?.as_str()?.to_string(),
                serde_json::Value::String(s) => s.clone(),
                _ => return None,
            };
            Some(format!("{}: {}", field, first))
        })
        .collect();

    if fields.is_empty() {
        text.trim().to_string()
    } else {
        fields.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message() {
        assert_eq!(
            backend_message(r#"{"error": "Insufficient stock for Cable"}"#),
            "Insufficient stock for Cable"
        );
        assert_eq!(backend_message(r#"{"detail": "Not found."}"#), "Not found.");
        assert_eq!(
            backend_message(r#"{"phone": ["This field is required."]}"#),
            "phone: This field is required."
        );
        assert_eq!(backend_message("<html>oops</html>\n"), "<html>oops</html>");
        assert_eq!(backend_message("[]"), "[]");
    }

    #[test]
    fn test_url_joining() {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:8000/api/".to_string();
        let http = HttpClient::new(&config).unwrap();

        assert_eq!(http.base_url(), "http://127.0.0.1:8000/api");
        assert_eq!(http.url("products/"), "http://127.0.0.1:8000/api/products/");
        assert_eq!(http.url("/bills/4/"), "http://127.0.0.1:8000/api/bills/4/");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://nope".to_string();
        assert!(HttpClient::new(&config).unwrap_err().is_config_error());
    }
}
