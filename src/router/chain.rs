use std::sync::Arc;

use tracing::debug;

use crate::{
    handler::{Flow, Handler},
    request::Request,
    response_writer::Response,
};

/// Runs a matched route's callbacks in order. Returns false once a callback
/// fails; a callback that stops ends the chain keeping the result so far.
/// An empty chain succeeds.
pub fn run_chain(
    callbacks: &[Arc<dyn Handler>],
    w: &mut dyn Response,
    r: &mut dyn Request,
) -> bool {
    for (idx, callback) in callbacks.iter().enumerate() {
        match callback.handle(w, r) {
            Flow::Continue => {}
            Flow::Stop => {
                debug!(idx, "chain stopped");
                return true;
            }
            Flow::Fail => {
                debug!(idx, "chain failed");
                return false;
            }
        }
    }
    true
}
