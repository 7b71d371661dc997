//! Error types for orchid-remote.

use thiserror::Error;

/// Body excerpt kept on status errors.
const BODY_EXCERPT_LEN: usize = 512;

/// All errors that can arise from remote calls.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection refused, DNS failure, timeout, TLS failure.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered 404.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx answer.
    #[error("{url} returned HTTP {code}: {body}")]
    Status { url: String, code: u16, body: String },

    /// The body of a 2xx answer did not decode.
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The identity provider rejected the request; the message is shown verbatim.
    #[error("{0}")]
    Auth(String),

    /// No identity provider key is configured.
    #[error("identity provider api_key is not configured (set api_key in ~/.orchid/config.yaml)")]
    MissingApiKey,
}

impl RemoteError {
    pub(crate) fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(404, _) => RemoteError::NotFound {
                url: url.to_string(),
            },
            ureq::Error::Status(code, response) => {
                let mut body = response.into_string().unwrap_or_default();
                if body.len() > BODY_EXCERPT_LEN {
                    let mut cut = BODY_EXCERPT_LEN;
                    while !body.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    body.truncate(cut);
                }
                RemoteError::Status {
                    url: url.to_string(),
                    code,
                    body,
                }
            }
            ureq::Error::Transport(transport) => RemoteError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        }
    }

    /// Transport failures, throttling and server errors are worth another try.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Transport { .. } => true,
            RemoteError::Status { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
