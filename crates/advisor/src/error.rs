/// Errors from the generative-text layer.
///
/// Never shown to the user: callers map every variant to fallback text.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// No API credential is configured.
    #[error("no API key configured")]
    MissingCredential,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("generative API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed but carried no usable text.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for AdvisoryError {
    /// Drops the request URL so endpoint details stay out of logs.
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}
