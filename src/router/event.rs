use crate::{dal::DB, logic, router::util::FutureExt, view};
use futures::Future;
use serde_derive::Deserialize;
use warp::{http::StatusCode, path, Filter};

/// The route for creating an event, or joining an existing one with the same description. The
/// user named in the path joins it either way, along with everyone in the body's `users` list.
pub fn create() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Body {
        description: Option<String>,
        users: Option<Vec<i32>>,
    }

    path!(i32)
        .and(warp::path::end())
        .and(warp::body::content_length_limit(2 * 1024))
        .and(warp::ext::get::<DB>())
        .and(warp::body::json())
        .and_then(|creator: i32, db: DB, body: Body| {
            logic::create_event(db, creator, body.description, body.users)
                .and_then(|detail| view::render_json(StatusCode::CREATED, &detail))
                .err_to_rejection()
        })
        .boxed()
}
