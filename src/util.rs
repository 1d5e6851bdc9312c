//! Various utilities.

use failure::{Error, Fail};
use futures::{future::poll_fn, Async, Future};
use log::error;

/// The error reported when a required entity id doesn't resolve to anything persistent.
#[derive(Clone, Copy, Debug, Fail)]
#[fail(display = "{} not found", _0)]
pub struct NotFound(pub &'static str);

/// Logs an error, including its causes and backtrace (if possible).
pub fn log_err(err: &Error) {
    let mut causes = err.iter_chain();
    if let Some(first) = causes.next() {
        error!("{}", first);
    }
    for cause in causes {
        error!("caused by: {}", cause);
    }
    let bt = err.backtrace().to_string();
    if bt != "" {
        error!("{}", bt);
    }
}

/// Runs a synchronous function inside the tokio threadpool's blocking section, so it doesn't tie
/// up a worker thread. The future this returns must therefore be run on a threadpool runtime.
pub fn blocking<E, F, T>(func: F) -> impl Future<Item = T, Error = Error>
where
    E: Into<Error>,
    F: FnOnce() -> Result<T, E>,
{
    let mut func = Some(func);
    poll_fn(move || {
        let poll = tokio_threadpool::blocking(|| {
            let func = func.take().expect("blocking future polled after completion");
            func()
        });
        match poll {
            Ok(Async::Ready(Ok(val))) => Ok(Async::Ready(val)),
            Ok(Async::Ready(Err(err))) => Err(err.into()),
            Ok(Async::NotReady) => Ok(Async::NotReady),
            Err(err) => Err(Error::from(err)),
        }
    })
}

/// The type of a responder. Since `impl Trait` can't be used in `type` items, this magics one up.
macro_rules! Resp {
    () => { warp::filters::BoxedFilter<(impl warp::Reply,)> };
}

/// Inserts `.or(...)` between the given filters.
macro_rules! route_any {
    ($hm:ident $hp:tt => $h:expr $(, $tm:ident $tp:tt => $t:expr)* $(,)*) => {
        route_any!(@internal @path $hm $hp).and($h)
            $(.or(route_any!(@internal @path $tm $tp).and($t)))*
    };

    (@internal @path DELETE ()) => {{ warp::delete2() }};
    (@internal @path GET ()) => {{ warp::get2() }};
    (@internal @path POST ()) => {{ warp::post2() }};
    (@internal @path $m:ident $p:tt) => {{
        use warp::path;
        route_any!(@internal @path $m ()).and(path! $p)
    }};
}
