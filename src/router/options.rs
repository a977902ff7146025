/// Settings for `Router::listen`.
#[derive(Clone, Debug, Default)]
pub struct RouterOptions {
    /// Prefix stripped from the request path before matching, for routers
    /// mounted under a sub-path.
    pub root_url: String,
}

impl RouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }
}
