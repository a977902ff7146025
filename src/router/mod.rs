use std::{collections::HashMap, sync::Arc};

use strum::IntoEnumIterator;
use tracing::{info, span, Level, Span};

use crate::{
    error::RouterError,
    handler::{handler, Flow, Handler},
    http_method::HttpMethod,
    params::Params,
    request::{url_decode, Request},
    response_writer::Response,
    status_code_registry::ReasonPhrase,
};

pub use dispatch::MatchOutcome;
pub use entry::{Entry, GroupEntry, RouteEntry, Templates};
pub use options::RouterOptions;
pub use pattern::RoutePattern;

mod chain;
mod dispatch;
mod entry;
mod options;
mod pattern;

/// Result of `Router::listen`.
#[derive(Debug)]
pub struct ListenResult {
    /// True only when a route matched path and method and no callback failed.
    pub ok: bool,
    /// Parameters captured by the last matching group or route.
    pub params: Params,
}

/// A group opened by `group` and not yet closed by `end`.
struct Frame {
    index: usize,
    route: String,
}

/// The route tree plus the registration cursor.
///
/// Registration calls go to the innermost open group. Build the tree first,
/// then share the router read-only; `listen` never mutates it.
#[derive(Default)]
pub struct Router {
    children: Vec<Entry>,
    open: Vec<Frame>,
    cache: HashMap<(String, bool), Arc<RoutePattern>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[Entry] {
        &self.children
    }

    fn current_route(&self) -> &str {
        self.open.last().map_or("", |frame| frame.route.as_str())
    }

    fn current_children(&mut self) -> &mut Vec<Entry> {
        let mut children = &mut self.children;
        for frame in &self.open {
            children = match &mut children[frame.index] {
                Entry::Group(group) => &mut group.children,
                _ => unreachable!("open frames point at groups"),
            };
        }
        children
    }

    fn compile(&mut self, route: &str, is_prefix: bool) -> Result<Arc<RoutePattern>, RouterError> {
        let key = (route.to_owned(), is_prefix);
        if let Some(pattern) = self.cache.get(&key) {
            return Ok(pattern.clone());
        }
        let pattern = Arc::new(RoutePattern::compile(route, is_prefix)?);
        self.cache.insert(key, pattern.clone());
        Ok(pattern)
    }

    fn add_entries(
        &mut self,
        method: HttpMethod,
        templates: &Templates,
        callbacks: &[Arc<dyn Handler>],
    ) -> Result<(), RouterError> {
        let parent = self.current_route().to_owned();
        let mut entries = vec![];
        for template in templates.iter() {
            let route = entry::join_routes(&parent, template);
            let pattern = self.compile(&route, false)?;
            entries.push(Entry::Route(RouteEntry {
                template: template.to_owned(),
                route,
                method,
                pattern,
                callbacks: callbacks.to_vec(),
            }));
        }
        self.current_children().extend(entries);
        Ok(())
    }

    /// Registers `callbacks` for `method` on every template. `method` is
    /// matched case-insensitively against the supported methods.
    pub fn add_route(
        &mut self,
        method: &str,
        templates: impl Into<Templates>,
        callbacks: Vec<Arc<dyn Handler>>,
    ) -> Result<&mut Self, RouterError> {
        let method = HttpMethod::parse_registered(method)?;
        self.on(method, templates, callbacks)
    }

    pub fn on(
        &mut self,
        method: HttpMethod,
        templates: impl Into<Templates>,
        callbacks: Vec<Arc<dyn Handler>>,
    ) -> Result<&mut Self, RouterError> {
        self.add_entries(method, &templates.into(), &callbacks)?;
        Ok(self)
    }

    pub fn get(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        self.on(HttpMethod::Get, templates, vec![handler(h)])
    }

    pub fn post(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        self.on(HttpMethod::Post, templates, vec![handler(h)])
    }

    pub fn put(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        self.on(HttpMethod::Put, templates, vec![handler(h)])
    }

    pub fn delete(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        self.on(HttpMethod::Delete, templates, vec![handler(h)])
    }

    pub fn patch(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        self.on(HttpMethod::Patch, templates, vec![handler(h)])
    }

    pub fn options(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        self.on(HttpMethod::Options, templates, vec![handler(h)])
    }

    pub fn head(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        self.on(HttpMethod::Head, templates, vec![handler(h)])
    }

    /// Registers `h` once per supported method.
    pub fn all(
        &mut self,
        templates: impl Into<Templates>,
        h: impl Handler + 'static,
    ) -> Result<&mut Self, RouterError> {
        let templates = templates.into();
        let callbacks = vec![handler(h)];
        for method in HttpMethod::iter() {
            self.add_entries(method, &templates, &callbacks)?;
        }
        Ok(self)
    }

    /// Opens a group under the current one. Following calls register into it
    /// until `end`.
    pub fn group(&mut self, template: &str) -> Result<&mut Self, RouterError> {
        let route = entry::join_routes(self.current_route(), template);
        let pattern = self.compile(&route, true)?;

        let children = self.current_children();
        children.push(Entry::Group(GroupEntry {
            template: template.to_owned(),
            route: route.clone(),
            pattern,
            children: vec![],
        }));
        let index = children.len() - 1;

        self.open.push(Frame { index, route });
        Ok(self)
    }

    /// Alias of `group`.
    pub fn route(&mut self, template: &str) -> Result<&mut Self, RouterError> {
        self.group(template)
    }

    /// Closes the innermost open group. A no-op at the root.
    pub fn end(&mut self) -> &mut Self {
        self.open.pop();
        self
    }

    /// Adds middleware at the current position. It runs for every request
    /// whose traversal reaches it.
    pub fn use_middleware(&mut self, h: impl Handler + 'static) -> &mut Self {
        self.current_children().push(Entry::Middleware(handler(h)));
        self
    }

    /// Finds the route for `method` on `path` without running its callbacks.
    /// Middleware met on the way does run.
    pub fn dispatch<'a>(
        &'a self,
        path: &str,
        method: &str,
        w: &mut dyn Response,
        r: &mut dyn Request,
    ) -> MatchOutcome<'a> {
        dispatch::dispatch(&self.children, path, method, w, r)
    }

    /// Routes one request: runs middleware and the matched route's callbacks,
    /// or answers 404 / 405.
    pub fn listen(
        &self,
        options: &RouterOptions,
        w: &mut dyn Response,
        r: &mut dyn Request,
    ) -> ListenResult {
        let path = extract_path(r.path(), &options.root_url);
        let method = r.method().to_owned();

        let span = create_req_span(&method, &path);
        let _guard = span.enter();

        let ok = match self.dispatch(&path, &method, w, r) {
            MatchOutcome::Matched(route, _) => {
                info!("match: {}", route.route());
                chain::run_chain(route.callbacks(), w, r)
            }
            MatchOutcome::MethodMismatch { allowed } => {
                let allowed = allowed
                    .iter()
                    .map(HttpMethod::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                w.set_reason_phrase(ReasonPhrase::MethodNotAllowed);
                w.add_header("Allow", &allowed);
                w.end();
                false
            }
            MatchOutcome::NotFound => {
                w.set_reason_phrase(ReasonPhrase::NotFound);
                w.end();
                false
            }
            MatchOutcome::Stopped => false,
        };

        ListenResult {
            ok,
            params: r.params().clone(),
        }
    }
}

impl Handler for Router {
    fn handle(&self, w: &mut dyn Response, r: &mut dyn Request) -> Flow {
        self.listen(&RouterOptions::default(), w, r).ok.into()
    }
}

fn extract_path(path: &str, root_url: &str) -> String {
    url_decode(path.strip_prefix(root_url).unwrap_or(path))
}

fn create_req_span(method: &str, target: &str) -> Span {
    span!(Level::INFO, "req", method, target)
}
