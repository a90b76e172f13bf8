//! URL construction for backend endpoints.

use url::Url;

use crate::error::ClientError;

/// Parse and validate the configured API base.
pub(crate) fn parse_base_url(base: &str) -> Result<Url, ClientError> {
    let url = Url::parse(base.trim()).map_err(|source| ClientError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ClientError::UnsupportedScheme(base.to_string())),
    }
}

/// Append an endpoint path to the base, keeping the base's own path prefix.
///
/// `http://host:8081/api/v1` + `/ai-chain/chat/answer` gives
/// `http://host:8081/api/v1/ai-chain/chat/answer`.
pub(crate) fn build_endpoint_url(base: &Url, endpoint: &str) -> Url {
    let mut url = base.clone();

    let base_path = url.path().trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    url.set_path(&format!("{base_path}/{endpoint}"));
    url.set_query(None);

    url
}
