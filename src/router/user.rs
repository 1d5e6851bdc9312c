use crate::{dal::DB, logic, router::util::FutureExt, view};
use futures::Future;
use serde_derive::Deserialize;
use warp::{http::StatusCode, path, Filter};

/// The route for creating a user.
pub fn create() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Body {
        name: Option<String>,
        username: Option<String>,
    }

    warp::path::end()
        .and(warp::body::content_length_limit(2 * 1024))
        .and(warp::ext::get::<DB>())
        .and(warp::body::json())
        .and_then(|db: DB, body: Body| {
            logic::create_user(db, body.name, body.username)
                .and_then(|detail| view::render_json(StatusCode::CREATED, &detail))
                .err_to_rejection()
        })
        .boxed()
}

/// The route for getting a user by id.
pub fn get() -> Resp!() {
    path!(i32)
        .and(warp::path::end())
        .and(warp::ext::get::<DB>())
        .and_then(|user: i32, db: DB| {
            logic::get_user(db, user)
                .and_then(|detail| view::render_json(StatusCode::OK, &detail))
                .err_to_rejection()
        })
        .boxed()
}

/// The route for deleting a user, its timeslots and memberships included.
pub fn delete() -> Resp!() {
    path!(i32)
        .and(warp::path::end())
        .and(warp::ext::get::<DB>())
        .and_then(|user: i32, db: DB| {
            logic::delete_user(db, user)
                .and_then(|detail| view::render_json(StatusCode::OK, &detail))
                .err_to_rejection()
        })
        .boxed()
}
