use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tracing::Level;

use crate::{
    handler::Handler,
    request::Request,
    response_writer::Response,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A callback that bumps `count` every time it runs.
pub fn counting_handler(count: &Arc<AtomicUsize>) -> impl Handler {
    adding_handler(count, 1)
}

/// Like `counting_handler` but adds `by`.
pub fn adding_handler(count: &Arc<AtomicUsize>, by: usize) -> impl Handler {
    let count = count.clone();
    move |_: &mut dyn Response, _: &mut dyn Request| {
        count.fetch_add(by, Ordering::SeqCst);
    }
}
