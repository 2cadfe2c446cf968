use std::future::Future;

use log::{debug, warn};
use tunescout_core::config::CatalogSettings;

use crate::{
    errors::CatalogError,
    models::{SearchRequest, SearchResponse},
};

/// Something that can be searched.
///
/// Implementations must be safe to call concurrently, a single catalog is shared by every
/// search session.
pub trait Catalog: Send + Sync + 'static {
    /// Run a search.
    ///
    /// # Errors
    ///
    /// Fails if the request can't be sent, the catalog responds with an error status,
    /// or the response can't be decoded.
    fn search(
        &self,
        request: SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, CatalogError>> + Send;
}

/// The catalog, over HTTP.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client can't be initialized (e.g. no TLS backend is available).
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The endpoint searches are sent to.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

impl Catalog for CatalogClient {
    #[tracing::instrument(
        name = "catalog_search",
        skip_all,
        fields(term = %request.term, media = %request.media, limit = request.limit)
    )]
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, CatalogError> {
        let url = self.search_url();
        debug!("GET {url} term={:?}", request.term);

        let response = self
            .http
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("catalog responded with {status}");
            return Err(CatalogError::Status { status, url });
        }

        // the catalog labels its JSON as `text/javascript`, so ignore the content type
        let body = response.bytes().await?;
        let decoded: SearchResponse = serde_json::from_slice(&body)?;

        debug!("Found {} results", decoded.result_count);

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::{
        io::{AsyncReadExt as _, AsyncWriteExt as _},
        net::TcpListener,
        task::JoinHandle,
    };

    use crate::models::MediaKind;

    const RECORDED: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../assets/search_result.json"
    ));

    /// Serve a single canned HTTP response, returning the base url and a handle that resolves to
    /// the raw request that was received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();

            let response = format!(
                "{status_line}\r\nContent-Type: text/javascript; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            request
        });

        (format!("http://{addr}/"), handle)
    }

    fn client_for(base_url: String) -> CatalogClient {
        CatalogClient::new(&CatalogSettings {
            base_url,
            ..CatalogSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_search_url_strips_trailing_slash() {
        let client = client_for("https://itunes.apple.com/".into());
        assert_eq!(client.search_url(), "https://itunes.apple.com/search");
    }

    #[tokio::test]
    async fn test_search_decodes_recorded_response() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", RECORDED).await;
        let client = client_for(base_url);

        let response = client.search(SearchRequest::new("raye")).await.unwrap();

        assert_eq!(response.result_count, 53);
        assert_eq!(response.results.len(), 53);
        assert_eq!(response.results[0].artist_name, "RAYE");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /search?term=raye&media=music&limit=50 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_search_sends_media_and_limit() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "{\"resultCount\":0,\"results\":[]}").await;
        let client = client_for(base_url);

        let response = client
            .search(
                SearchRequest::new("the office")
                    .media(MediaKind::TvShow)
                    .limit(5),
            )
            .await
            .unwrap();
        assert_eq!(response, SearchResponse::default());

        let request = server.await.unwrap();
        assert!(
            request.starts_with("GET /search?term=the+office&media=tvShow&limit=5 "),
            "unexpected request: {request}"
        );
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let (base_url, _server) = serve_once("HTTP/1.1 503 Service Unavailable", "").await;
        let client = client_for(base_url);

        let result = client.search(SearchRequest::new("raye")).await;

        assert!(
            matches!(
                result,
                Err(CatalogError::Status { status, .. }) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
            ),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_decode_error() {
        let (base_url, _server) = serve_once("HTTP/1.1 200 OK", "<html>nope</html>").await;
        let client = client_for(base_url);

        let result = client.search(SearchRequest::new("raye")).await;

        assert!(matches!(result, Err(CatalogError::Decode(_))), "unexpected result: {result:?}");
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_a_request_error() {
        // bind then drop a listener so the port is (almost certainly) closed
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}"));
        let result = client.search(SearchRequest::new("raye")).await;

        assert!(matches!(result, Err(CatalogError::Request(_))), "unexpected result: {result:?}");
    }
}
