//! Business logic.
//!
//! > **Logic** is the "business (or domain) logic" of the application. The router will pull the
//! > necessary information out of the HTTP request, and call into this module as quickly as
//! > possible to do all the actual work.
//!
//! Fields absent from a request body keep their historical defaults: empty strings, weekday `0`,
//! an empty guest list.

use crate::{
    dal::DB,
    schema::{EventDetail, Time, UserDetail},
};
use failure::Error;
use futures::Future;

/// Creates a user.
pub fn create_user(
    db: DB,
    name: Option<String>,
    username: Option<String>,
) -> impl Future<Item = UserDetail, Error = Error> {
    db.create_user(name.unwrap_or_default(), username.unwrap_or_default())
}

/// Gets a user by id.
pub fn get_user(db: DB, user: i32) -> impl Future<Item = UserDetail, Error = Error> {
    db.get_user(user)
}

/// Deletes a user, along with its timeslots and event memberships.
pub fn delete_user(db: DB, user: i32) -> impl Future<Item = UserDetail, Error = Error> {
    db.delete_user(user)
}

/// Creates an availability timeslot for a user. A missing weekday means the first day of the
/// week.
pub fn create_time(
    db: DB,
    user: i32,
    weekday: Option<i32>,
    timeslot: Option<String>,
) -> impl Future<Item = Time, Error = Error> {
    db.create_time(user, weekday.unwrap_or(0), timeslot.unwrap_or_default())
}

/// Deletes one of a user's timeslots.
pub fn delete_time(db: DB, user: i32, time: i32) -> impl Future<Item = Time, Error = Error> {
    db.delete_time(user, time)
}

/// Finds or creates the event with the given description, then joins the creator and everyone in
/// `users` to it.
pub fn create_event(
    db: DB,
    creator: i32,
    description: Option<String>,
    users: Option<Vec<i32>>,
) -> impl Future<Item = EventDetail, Error = Error> {
    db.create_or_join_event(
        description.unwrap_or_default(),
        roster(creator, users.unwrap_or_default()),
    )
}

/// The distinct set of user ids to join to an event: the creator first, then the listed users,
/// duplicates collapsed.
fn roster(creator: i32, users: Vec<i32>) -> Vec<i32> {
    let mut ids = vec![creator];
    for id in users {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
