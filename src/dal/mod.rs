//! Bindings to the database.
//!
//! > **DAL**, for lack of a better term (borrowing this one from "data access layer" since I don't
//! > want to use "model"), is the only module that does any talking to the database, or any other
//! > IO or interaction with other kinds of externalized state for that matter.
//!
//! Every public method here is one store operation, run as a single transaction; a request either
//! commits all of its writes or none of them.

#[allow(proc_macro_derive_resolution_fallback, unused_import_braces)]
mod schema;

embed_migrations!("migrations");

use crate::{
    dal::schema::{events, memberships, times, users},
    schema::{Event, EventDetail, Time, User, UserDetail, UserSummary},
    util::{blocking, NotFound},
};
use diesel::{
    dsl::{delete, exists, insert_into, select},
    prelude::*,
    r2d2::{ConnectionManager, Pool},
    QueryResult,
};
use failure::Error;
use futures::{
    future::{err, Either},
    Future,
};
use std::sync::Arc;

/// A pool of connections to the database.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct DB {
    pool: Arc<Pool<ConnectionManager<PgConnection>>>,
}

impl DB {
    /// Connects to the database at the given URL, creating the schema if it isn't there yet.
    pub fn connect(database_url: &str) -> Result<DB, Error> {
        let pool = Arc::new(Pool::new(ConnectionManager::new(database_url))?);
        embedded_migrations::run(&pool.get()?)?;
        Ok(DB { pool })
    }

    /// Creates a user, returning its detail shape. Names and usernames are not required to be
    /// unique; the id is the only stable reference to a user.
    pub fn create_user(
        &self,
        name: String,
        username: String,
    ) -> impl Future<Item = UserDetail, Error = Error> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|| {
                let user: User = insert_into(users::table)
                    .values((users::name.eq(&name), users::username.eq(&username)))
                    .get_result(conn)?;
                Ok(load_user_detail(conn, user)?)
            })
        })
    }

    /// Gets a user by id, with its whole relational neighborhood.
    pub fn get_user(&self, user: i32) -> impl Future<Item = UserDetail, Error = Error> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|| {
                let user = users::table
                    .find(user)
                    .first::<User>(conn)
                    .optional()?
                    .ok_or(NotFound("User"))?;
                Ok(load_user_detail(conn, user)?)
            })
        })
    }

    /// Deletes a user, returning the detail shape it had. The user's timeslots and event
    /// memberships are removed with it by the foreign key cascades.
    pub fn delete_user(&self, user: i32) -> impl Future<Item = UserDetail, Error = Error> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|| {
                let row = users::table
                    .find(user)
                    .first::<User>(conn)
                    .optional()?
                    .ok_or(NotFound("User"))?;
                let detail = load_user_detail(conn, row)?;
                let _ = delete(users::table.find(user)).execute(conn)?;
                Ok(detail)
            })
        })
    }

    /// Creates a timeslot owned by the given user.
    pub fn create_time(
        &self,
        user: i32,
        weekday: i32,
        timeslot: String,
    ) -> impl Future<Item = Time, Error = Error> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|| {
                let known: bool = select(exists(users::table.find(user))).get_result(conn)?;
                if !known {
                    return Err(NotFound("User").into());
                }
                let time: Time = insert_into(times::table)
                    .values((
                        times::weekday.eq(weekday),
                        times::timeslot.eq(&timeslot),
                        times::user_id.eq(user),
                    ))
                    .get_result(conn)?;
                Ok(time)
            })
        })
    }

    /// Deletes a timeslot, returning the deleted row. The lookup is scoped by owner; a timeslot
    /// id that belongs to some other user is treated as not found.
    pub fn delete_time(&self, user: i32, time: i32) -> impl Future<Item = Time, Error = Error> {
        self.async_query(move |conn| {
            let deleted: Option<Time> = delete(
                times::table
                    .filter(times::id.eq(time))
                    .filter(times::user_id.eq(user)),
            )
            .get_result(conn)
            .optional()?;
            deleted.ok_or_else(|| Error::from(NotFound("Timeslot")))
        })
    }

    /// Finds the event with the given description, or creates it, then joins every user in
    /// `roster` to it. Joining an event twice is a no-op, and the whole operation fails if any
    /// roster id doesn't resolve to a user.
    pub fn create_or_join_event(
        &self,
        description: String,
        roster: Vec<i32>,
    ) -> impl Future<Item = EventDetail, Error = Error> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|| {
                let known: Vec<i32> = users::table
                    .filter(users::id.eq_any(roster.as_slice()))
                    .select(users::id)
                    .load(conn)?;
                if known.len() != roster.len() {
                    return Err(NotFound("User").into());
                }

                // description is a find-or-create key, not a unique column; if concurrent
                // requests race one into duplicates, the oldest row wins from then on
                let found = events::table
                    .filter(events::description.eq(&description))
                    .order(events::id.asc())
                    .first::<Event>(conn)
                    .optional()?;
                let event = match found {
                    Some(event) => event,
                    None => insert_into(events::table)
                        .values(events::description.eq(&description))
                        .get_result(conn)?,
                };

                let rows = roster
                    .iter()
                    .map(|&user| {
                        (
                            memberships::user_id.eq(user),
                            memberships::event_id.eq(event.id),
                        )
                    })
                    .collect::<Vec<_>>();
                let _ = insert_into(memberships::table)
                    .values(&rows)
                    .on_conflict_do_nothing()
                    .execute(conn)?;

                Ok(load_event_detail(conn, event)?)
            })
        })
    }

    /// Performs a query "asynchronously" (but not really). Diesel currently does not support
    /// async/futures, so we use `crate::util::blocking` so the database operations don't block
    /// the thread. This does, however, require the future to be run inside a threadpool.
    fn async_query<E, F, T>(&self, func: F) -> impl Future<Item = T, Error = Error>
    where
        E: Into<Error>,
        F: FnOnce(&PgConnection) -> Result<T, E>,
    {
        match self.pool.get() {
            Ok(conn) => Either::A(blocking(move || func(&*conn).map_err(E::into))),
            Err(e) => Either::B(err(e.into())),
        }
    }
}

/// Loads the timeslots a user owns, oldest first.
fn user_times(conn: &PgConnection, user: i32) -> QueryResult<Vec<Time>> {
    times::table
        .filter(times::user_id.eq(user))
        .order(times::id.asc())
        .load(conn)
}

/// Assembles a user's detail shape, expanding the events it joined one level.
fn load_user_detail(conn: &PgConnection, user: User) -> QueryResult<UserDetail> {
    let available = user_times(conn, user.id)?;
    let joined: Vec<Event> = memberships::table
        .filter(memberships::user_id.eq(user.id))
        .inner_join(events::table)
        .select(events::all_columns)
        .order(events::id.asc())
        .load(conn)?;
    let joined = joined
        .into_iter()
        .map(|event| load_event_detail(conn, event))
        .collect::<QueryResult<Vec<_>>>()?;
    Ok(UserDetail::new(user, available, joined))
}

/// Assembles an event's detail shape, with its members in summary form.
fn load_event_detail(conn: &PgConnection, event: Event) -> QueryResult<EventDetail> {
    let members: Vec<User> = memberships::table
        .filter(memberships::event_id.eq(event.id))
        .inner_join(users::table)
        .select(users::all_columns)
        .order(users::id.asc())
        .load(conn)?;
    let members = members
        .into_iter()
        .map(|member| {
            let available = user_times(conn, member.id)?;
            Ok(UserSummary::new(member, available))
        })
        .collect::<QueryResult<Vec<_>>>()?;
    Ok(EventDetail::new(event, members))
}
