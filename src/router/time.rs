use crate::{dal::DB, logic, router::util::FutureExt, view};
use futures::Future;
use serde_derive::Deserialize;
use warp::{http::StatusCode, path, Filter};

/// The route for adding an availability timeslot to a user.
pub fn create() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Body {
        weekday: Option<i32>,
        timeslot: Option<String>,
    }

    path!(i32 / "times")
        .and(warp::path::end())
        .and(warp::body::content_length_limit(2 * 1024))
        .and(warp::ext::get::<DB>())
        .and(warp::body::json())
        .and_then(|user: i32, db: DB, body: Body| {
            logic::create_time(db, user, body.weekday, body.timeslot)
                .and_then(|time| view::render_json(StatusCode::CREATED, &time))
                .err_to_rejection()
        })
        .boxed()
}

/// The route for deleting one of a user's timeslots.
pub fn delete() -> Resp!() {
    path!(i32 / "times" / i32)
        .and(warp::path::end())
        .and(warp::ext::get::<DB>())
        .and_then(|user: i32, time: i32, db: DB| {
            logic::delete_time(db, user, time)
                .and_then(|time| view::render_json(StatusCode::OK, &time))
                .err_to_rejection()
        })
        .boxed()
}
