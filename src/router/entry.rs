use std::sync::Arc;

use crate::{handler::Handler, http_method::HttpMethod};

use super::pattern::RoutePattern;

/// A node of the route tree. Children are kept in declaration order and
/// dispatch tries them in that order.
pub enum Entry {
    Middleware(Arc<dyn Handler>),
    Route(RouteEntry),
    Group(GroupEntry),
}

/// A leaf: one method, one template, an ordered list of callbacks.
pub struct RouteEntry {
    pub(super) template: String,
    pub(super) route: String,
    pub(super) method: HttpMethod,
    pub(super) pattern: Arc<RoutePattern>,
    pub(super) callbacks: Vec<Arc<dyn Handler>>,
}

impl RouteEntry {
    /// Template as registered, relative to the enclosing group.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Template joined with every enclosing group's.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn callbacks(&self) -> &[Arc<dyn Handler>] {
        &self.callbacks
    }
}

pub struct GroupEntry {
    pub(super) template: String,
    pub(super) route: String,
    pub(super) pattern: Arc<RoutePattern>,
    pub(super) children: Vec<Entry>,
}

impl GroupEntry {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn children(&self) -> &[Entry] {
        &self.children
    }
}

/// Joins a parent route and a child template into one path, collapsing the
/// doubled slash the concatenation introduces.
pub fn join_routes(parent: &str, child: &str) -> String {
    format!("{}/{}", parent, child).replace("//", "/")
}

/// One or more templates registered with the same method and callbacks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Templates(Vec<String>);

impl Templates {
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|t| t.as_str())
    }
}

impl From<&str> for Templates {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for Templates {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&[&str]> for Templates {
    fn from(value: &[&str]) -> Self {
        Self(value.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Templates {
    fn from(value: [&str; N]) -> Self {
        Self(value.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<&str>> for Templates {
    fn from(value: Vec<&str>) -> Self {
        Self(value.into_iter().map(|t| t.to_owned()).collect())
    }
}

impl From<Vec<String>> for Templates {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}
