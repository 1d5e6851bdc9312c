use crate::{router::util::FutureExt, util::NotFound, view};
use failure::{Compat, Error};
use futures::{
    future::{err, result, Either},
    Future,
};
use log::warn;
use warp::{
    filters::body::BodyDeserializeError,
    http::{Response, StatusCode},
    Rejection,
};

/// Renders the failure conditions routes are expected to produce: a `NotFound` as a 404, an
/// unreadable request body as a 400. Anything else stays rejected for `last_chance`.
pub fn recover(rej: Rejection) -> impl Future<Item = Response<String>, Error = Rejection> {
    let resp = if let Some(not_found) = find_not_found(&rej) {
        view::render_error(StatusCode::NOT_FOUND, &not_found.to_string())
    } else if rej.find_cause::<BodyDeserializeError>().is_some() {
        view::render_error(StatusCode::BAD_REQUEST, "Invalid request body")
    } else {
        return Either::B(err(rej));
    };
    Either::A(result(resp).err_to_rejection())
}

/// A last-chance handler for unhandled errors that pass through the `recover` function, so the
/// response stays JSON like everything else. Unmatched routes keep warp's plain 404.
pub fn last_chance(rej: Rejection) -> impl Future<Item = Response<String>, Error = Rejection> {
    if rej.is_not_found() {
        return Either::B(err(rej));
    }
    warn!("unhandled rejection: {:?}", rej);
    let resp = view::render_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    Either::A(result(resp).err_to_rejection())
}

fn find_not_found(rej: &Rejection) -> Option<&NotFound> {
    rej.find_cause::<Compat<Error>>()
        .and_then(|compat| compat.get_ref().downcast_ref::<NotFound>())
}
