use thiserror::Error;

/// Misuse detected while the route tree is being built.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("duplicate parameter `{name}` in route `{template}`")]
    DuplicateParameter { template: String, name: String },

    #[error("malformed route `{template}`")]
    MalformedTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },

    #[error("route `{template}` declares {params} parameters but compiles to {groups} capture groups")]
    CaptureMismatch {
        template: String,
        params: usize,
        groups: usize,
    },
}
