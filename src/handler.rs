use std::{fmt::Debug, sync::Arc};

use tracing::error;

use crate::{request::Request, response_writer::Response};

/// What a callback asks of the chain it runs in.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Flow {
    /// Run the next callback.
    Continue,
    /// End the chain without reporting failure.
    Stop,
    /// End the chain and report failure.
    Fail,
}

impl From<()> for Flow {
    fn from(_: ()) -> Self {
        Flow::Continue
    }
}

impl From<bool> for Flow {
    fn from(ok: bool) -> Self {
        if ok {
            Flow::Continue
        } else {
            Flow::Fail
        }
    }
}

impl<E: Debug> From<Result<(), E>> for Flow {
    fn from(res: Result<(), E>) -> Self {
        match res {
            Ok(()) => Flow::Continue,
            Err(err) => {
                error!(?err, "handler failed");
                Flow::Fail
            }
        }
    }
}

/// Middleware and route callbacks. The route tree is shared read-only
/// between requests, hence `Send + Sync`.
pub trait Handler: Send + Sync {
    fn handle(&self, w: &mut dyn Response, r: &mut dyn Request) -> Flow;
}

impl<T, O> Handler for T
where
    T: Fn(&mut dyn Response, &mut dyn Request) -> O + Send + Sync,
    O: Into<Flow>,
{
    fn handle(&self, w: &mut dyn Response, r: &mut dyn Request) -> Flow {
        self(w, r).into()
    }
}

/// Boxes a handler so it can be shared by several routes.
pub fn handler(h: impl Handler + 'static) -> Arc<dyn Handler> {
    Arc::new(h)
}

#[cfg(test)]
pub fn noop_handler() -> impl Handler {
    |_: &mut dyn Response, _: &mut dyn Request| {}
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use crate::{request::MemoryRequest, response_writer::ResponseWriter};

    use super::*;

    fn run(h: &dyn Handler) -> Flow {
        let mut w = ResponseWriter::new_empty();
        let mut r = MemoryRequest::new();
        h.handle(&mut w, &mut r)
    }

    #[test]
    fn test_flow_from_return_values() {
        assert_eq!(run(&noop_handler()), Flow::Continue);
        assert_eq!(
            run(&|_: &mut dyn Response, _: &mut dyn Request| true),
            Flow::Continue
        );
        assert_eq!(
            run(&|_: &mut dyn Response, _: &mut dyn Request| false),
            Flow::Fail
        );
        assert_eq!(
            run(&|_: &mut dyn Response, _: &mut dyn Request| Flow::Stop),
            Flow::Stop
        );
    }

    #[test]
    fn test_flow_from_result() {
        let ok = |_: &mut dyn Response, _: &mut dyn Request| -> anyhow::Result<()> { Ok(()) };
        let err = |_: &mut dyn Response, _: &mut dyn Request| -> anyhow::Result<()> {
            Err(anyhow!("boom"))
        };
        assert_eq!(run(&ok), Flow::Continue);
        assert_eq!(run(&err), Flow::Fail);
    }

    #[test]
    fn test_handler_mutates_response() {
        let h = handler(|w: &mut dyn Response, _: &mut dyn Request| {
            w.set_status_code(201);
        });
        let mut w = ResponseWriter::new_empty();
        let mut r = MemoryRequest::new();
        h.handle(&mut w, &mut r);
        assert_eq!(w.get_status_code(), Some(201));
    }
}
