//! The HTTP server.
//!
//! > **Router** is the the only module that knows anything about HTTP. Every other part of the
//! > system has no knowledge of how the request is really being made. The router's responsibility
//! > is to call into the domain logic, and then render that response data with an appropriate view.

mod errors;
mod event;
mod time;
mod user;
mod util;

use crate::dal::DB;
use futures::{
    future::{loop_fn, ok, Loop},
    Future,
};
use log::{info, warn};
use std::net::SocketAddr;
use warp::Filter;

/// Starts an HTTP server at the given address. The polymorphism in the return type indicates that
/// the future will never resolve, since it can be trivially used as
/// `impl Future<Item = Void, Error = Void>`.
pub fn serve_on<T, E>(addr: SocketAddr, db: DB) -> impl Future<Item = T, Error = E> {
    loop_fn((), move |()| {
        info!("Starting to serve...");
        let server = routes(db.clone())
            .recover(errors::recover)
            .recover(errors::last_chance)
            .with(warp::log("planit::router"));
        warp::serve(server).bind(addr).then(|r| {
            let status = match r {
                Ok(()) => "success",
                Err(()) => "failure",
            };
            warn!("HTTP server exited with {}; restarting...", status);
            ok(Loop::Continue(()))
        })
    })
}

fn routes(db: DB) -> Resp!() {
    warp::any()
        .map(move || warp::ext::set(db.clone()))
        .untuple_one()
        .and(route_any! {
            POST ("users") => user::create(),
            GET ("users") => user::get(),
            DELETE ("users") => user::delete(),
            POST ("users") => time::create(),
            DELETE ("users") => time::delete(),
            POST ("events") => event::create(),
        })
        .boxed()
}
