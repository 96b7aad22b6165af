use thiserror::Error;

/// Failures at the I/O boundaries of the engine.
///
/// Extraction, synthesis, flow inference and emission are infallible; these
/// variants only come out of fetching, file output, config loading and the
/// inspector's selector lookup.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Markup could not be fetched at all (DNS, connect, TLS, timeout)
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client could not be configured (bad user agent, TLS backend)
    #[error("failed to build HTTP client: {source}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Inspector selector is not valid CSS
    #[error("invalid selector '{selector}'")]
    InvalidSelector { selector: String },

    /// Inspector selector matched nothing in the document
    #[error("no element matches '{selector}'")]
    SelectorNotFound { selector: String },
}

impl EngineError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        EngineError::Io {
            context: context.into(),
            source,
        }
    }
}
