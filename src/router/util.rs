use failure::Error;
use futures::{Async, Future};
use warp::Rejection;

/// An extension trait for Futures.
pub trait FutureExt: Sized {
    /// Converts an error to a `warp::Rejection`.
    fn err_to_rejection(self) -> ErrToRejection<Self>;
}

impl<F: Future<Error = Error>> FutureExt for F {
    fn err_to_rejection(self) -> ErrToRejection<Self> {
        ErrToRejection(self)
    }
}

/// A wrapper that converts errors to Rejections.
pub struct ErrToRejection<F>(F);

impl<F: Future<Error = Error>> Future for ErrToRejection<F> {
    type Item = F::Item;
    type Error = Rejection;

    fn poll(&mut self) -> Result<Async<F::Item>, Rejection> {
        match self.0.poll() {
            Ok(x) => Ok(x),
            Err(e) => Err(warp::reject::custom(e.compat())),
        }
    }
}
