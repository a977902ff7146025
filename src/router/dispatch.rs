use tracing::{debug, warn};

use crate::{
    handler::Flow, http_method::HttpMethod, params::Params, request::Request,
    response_writer::Response,
};

use super::entry::{Entry, RouteEntry};

/// How a single dispatch ended.
pub enum MatchOutcome<'a> {
    /// A leaf matched both path and method.
    Matched(&'a RouteEntry, Params),
    /// Some leaf matched the path, none the method. `allowed` lists the
    /// methods of the leaves that matched, in declaration order.
    MethodMismatch { allowed: Vec<HttpMethod> },
    NotFound,
    /// A middleware asked to stop.
    Stopped,
}

enum Step<'a> {
    Found(&'a RouteEntry, Params),
    Exhausted,
    Stopped,
}

struct Search<'p> {
    path: &'p str,
    method: &'p str,
    allowed: Vec<HttpMethod>,
    route_matched: bool,
}

/// Walks `children` depth-first in declaration order looking for the leaf
/// that serves `method` on `path`. Middleware is run as it is reached.
/// The request's parameters are cleared first, then every matching group or
/// route replaces them.
pub fn dispatch<'a>(
    children: &'a [Entry],
    path: &str,
    method: &str,
    w: &mut dyn Response,
    r: &mut dyn Request,
) -> MatchOutcome<'a> {
    r.with_params(Params::new());

    let mut search = Search {
        path,
        method,
        allowed: vec![],
        route_matched: false,
    };

    match search.find(children, w, r) {
        Step::Found(route, params) => MatchOutcome::Matched(route, params),
        Step::Stopped => MatchOutcome::Stopped,
        Step::Exhausted if search.route_matched => MatchOutcome::MethodMismatch {
            allowed: search.allowed,
        },
        Step::Exhausted => MatchOutcome::NotFound,
    }
}

impl<'p> Search<'p> {
    fn find<'a>(
        &mut self,
        children: &'a [Entry],
        w: &mut dyn Response,
        r: &mut dyn Request,
    ) -> Step<'a> {
        for entry in children {
            match entry {
                Entry::Middleware(h) => match h.handle(w, r) {
                    Flow::Continue => continue,
                    flow => {
                        warn!(?flow, "middleware stopped dispatch");
                        return Step::Stopped;
                    }
                },
                Entry::Route(route) => {
                    let Some(params) = route.pattern.captures(self.path) else {
                        continue;
                    };
                    r.with_params(params.clone());
                    self.route_matched = true;

                    if route.method.matches(self.method) {
                        return Step::Found(route, params);
                    }
                    debug!(route = route.route(), method = %route.method, "method differs");
                    if !self.allowed.contains(&route.method) {
                        self.allowed.push(route.method);
                    }
                }
                Entry::Group(group) => {
                    let Some(params) = group.pattern.captures(self.path) else {
                        continue;
                    };
                    r.with_params(params);
                    debug!(group = group.route(), "entering group");

                    match self.find(&group.children, w, r) {
                        Step::Exhausted => continue,
                        step => return step,
                    }
                }
            }
        }
        Step::Exhausted
    }
}
