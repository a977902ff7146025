use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::{extra::ExtraData, params::Params};

/// What the router and handlers need from an incoming request.
pub trait Request {
    /// Request target, including the query string.
    fn url(&self) -> &str;

    fn method(&self) -> &str;

    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<&str>;

    fn body(&self) -> Option<&[u8]>;

    fn params(&self) -> &Params;

    /// Attaches the parameters captured by the router.
    fn with_params(&mut self, params: Params);

    /// Data handed from middleware to later callbacks.
    fn extra(&self) -> &ExtraData;

    fn extra_mut(&mut self) -> &mut ExtraData;

    /// Request target without the query string. E.g. `/foo?bar=10` -> `/foo`.
    fn path(&self) -> &str {
        remove_queries(self.url())
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params().get(name)
    }

    /// Decoded query pairs, in the order they appear.
    fn queries(&self) -> Vec<(String, String)> {
        parse_queries(self.url())
    }

    fn query(&self, name: &str) -> Option<String> {
        self.queries()
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

/// A request held entirely in memory. Used by tests and the demo binary.
#[derive(Debug, Default)]
pub struct MemoryRequest {
    url: String,
    method: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
    params: Params,
    extra: ExtraData,
}

impl MemoryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Request for MemoryRequest {
    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|v| v.as_str())
    }

    fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn with_params(&mut self, params: Params) {
        self.params = params;
    }

    fn extra(&self) -> &ExtraData {
        &self.extra
    }

    fn extra_mut(&mut self) -> &mut ExtraData {
        &mut self.extra
    }
}

pub fn remove_queries(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// Form-style decoding: `+` is a space, then percent-escapes are resolved.
pub fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}

fn parse_queries(url: &str) -> Vec<(String, String)> {
    let Some((_, query)) = url.split_once('?') else {
        return vec![];
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (url_decode(k), url_decode(v)),
            None => (url_decode(pair), String::new()),
        })
        .collect()
}
