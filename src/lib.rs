pub use error::RouterError;
pub use extra::ExtraData;
pub use handler::{handler, Flow, Handler};
pub use http_method::HttpMethod;
pub use params::Params;
pub use request::{MemoryRequest, Request};
pub use response_writer::{Response, ResponseWriter};
pub use router::{
    Entry, GroupEntry, ListenResult, MatchOutcome, RouteEntry, RoutePattern, Router,
    RouterOptions, Templates,
};
pub use status_code_registry::ReasonPhrase;

mod error;
mod extra;
mod handler;
mod http_method;
mod params;
mod request;
mod response_writer;
mod router;
mod status_code_registry;
#[cfg(test)]
mod test_utils;
