//! `reqwest` implementation of [`Backend`].

use std::time::Duration;

use crime_choropleth_map_models::MunicipalityCollection;

use crate::{Backend, BackendError, decode};

/// Base URL used when neither a flag nor `CHOROPLETH_API_URL` is given.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Scheme, host, and port, without a trailing `/api`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl BackendConfig {
    /// Reads `CHOROPLETH_API_URL` and `CHOROPLETH_API_TIMEOUT_SECS`, falling
    /// back to the defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CHOROPLETH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = std::env::var("CHOROPLETH_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Replaces the base URL, keeping the timeout.
    #[must_use]
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Talks to the dashboard backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the base URL is not `http(s)` and
    /// [`BackendError::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(BackendError::Config {
                message: format!("API URL must start with http:// or https://: {}", config.base_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("crime-choropleth/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn list_municipalities(&self) -> Result<Vec<String>, BackendError> {
        let url = self.config.endpoint("municipios");
        log::debug!("GET {url}");

        let names: Vec<String> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(names)
    }

    async fn fetch_map_data(
        &self,
        crime_type: &str,
    ) -> Result<MunicipalityCollection, BackendError> {
        let url = self.config.endpoint("dados_mapa");
        log::debug!("GET {url}?crime={crime_type}");

        let body = self
            .client
            .get(&url)
            .query(&[("crime", crime_type)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        decode::decode_map_payload(&body, crime_type)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let config = BackendConfig::default().with_base_url("http://localhost:5000/");
        assert_eq!(
            config.endpoint("municipios"),
            "http://localhost:5000/api/municipios"
        );
    }

    #[test]
    fn rejects_non_http_url() {
        let config = BackendConfig::default().with_base_url("localhost:5000");
        assert!(matches!(
            HttpBackend::new(config),
            Err(BackendError::Config { .. })
        ));
    }

    /// Serves one HTTP response on a local port. The handle yields the
    /// request head the client sent.
    async fn serve_once(
        status: &'static str,
        body: String,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0_u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            String::from_utf8_lossy(&head).into_owned()
        });

        (base_url, handle)
    }

    fn backend_at(base_url: String) -> HttpBackend {
        HttpBackend::new(BackendConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn lists_municipalities() {
        let (base_url, server) =
            serve_once("200 OK", r#"["Caucaia","Fortaleza"]"#.to_string()).await;

        let names = backend_at(base_url).list_municipalities().await.unwrap();

        assert_eq!(names, vec!["Caucaia", "Fortaleza"]);
        assert!(server.await.unwrap().starts_with("GET /api/municipios "));
    }

    #[tokio::test]
    async fn fetches_double_encoded_map_data_with_encoded_crime() {
        let document = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-38.6, -3.9], [-38.4, -3.9], [-38.4, -3.7], [-38.6, -3.9]]]
                },
                "properties": {"name": "Fortaleza", "QUANTIDADE": 120, "TAXA_POR_100K": 4.5}
            }]
        });
        let body = serde_json::to_string(&document.to_string()).unwrap();
        let (base_url, server) = serve_once("200 OK", body).await;

        let collection = backend_at(base_url)
            .fetch_map_data("HOMICIDIO DOLOSO")
            .await
            .unwrap();

        assert_eq!(collection.crime_type, "HOMICIDIO DOLOSO");
        assert_eq!(collection.features[0].name, "Fortaleza");
        assert_eq!(collection.features[0].quantity, 120);
        assert!(collection.features[0].bounds.is_some());

        let request = server.await.unwrap();
        assert!(
            request.starts_with("GET /api/dados_mapa?crime=HOMICIDIO+DOLOSO "),
            "{request}"
        );
    }

    #[tokio::test]
    async fn server_error_status_is_an_http_error() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", "{}".to_string()).await;

        let err = backend_at(base_url).fetch_map_data("ROUBO").await.unwrap_err();

        assert!(matches!(err, BackendError::Http(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = backend_at(base_url).fetch_map_data("ROUBO").await.unwrap_err();

        assert!(matches!(err, BackendError::Http(_)));
    }
}
