use thiserror::Error;

/// A failed catalog request.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Catalog responded with {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("Failed to decode the catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;

    #[test]
    fn test_status_error_message() {
        let error = CatalogError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            url: "https://itunes.apple.com/search".into(),
        };
        assert_str_eq!(
            error.to_string(),
            "Catalog responded with 503 Service Unavailable for https://itunes.apple.com/search"
        );
    }

    #[test]
    fn test_decode_error_message() {
        let error: CatalogError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(
            error
                .to_string()
                .starts_with("Failed to decode the catalog response: ")
        );
    }
}
