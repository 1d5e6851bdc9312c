//! End-to-end tests against a live database.
//!
//! These talk to the Postgres database named by `DATABASE_URL` (a `.env` file works here too),
//! so they're ignored by default; run them with `cargo test -- --ignored` once the database is
//! up. Each test creates its own users, and event descriptions are salted with a timestamp, so
//! the tests don't trip over leftover rows or each other.

use failure::Error;
use planit::{dal::DB, logic, schema::UserDetail, util::NotFound};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::runtime::Runtime;

fn connect() -> (Runtime, DB) {
    dotenv::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let rt = Runtime::new().expect("couldn't start a runtime");
    let db = DB::connect(&url).expect("couldn't connect to the database");
    (rt, db)
}

fn create_user(rt: &mut Runtime, db: &DB, name: &str, username: &str) -> UserDetail {
    rt.block_on(logic::create_user(
        db.clone(),
        Some(name.to_owned()),
        Some(username.to_owned()),
    ))
    .expect("couldn't create a user")
}

/// A user id that's guaranteed not to resolve: the id of a user that was just deleted.
fn vanished_user(rt: &mut Runtime, db: &DB) -> i32 {
    let user = create_user(rt, db, "Ghost", "ghost");
    let _ = rt
        .block_on(logic::delete_user(db.clone(), user.id))
        .expect("couldn't delete the ghost user");
    user.id
}

fn unique(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    format!("{} {}", tag, nanos)
}

fn assert_not_found<T: std::fmt::Debug>(result: Result<T, Error>, what: &str) {
    let err = result.expect_err("expected a NotFound failure");
    let not_found = err
        .downcast_ref::<NotFound>()
        .expect("expected a NotFound failure");
    assert_eq!(not_found.to_string(), format!("{} not found", what));
}

#[test]
#[ignore]
fn created_user_round_trips() {
    let (mut rt, db) = connect();
    let created = create_user(&mut rt, &db, "Ann", "ann1");
    assert_eq!(created.name, "Ann");
    assert_eq!(created.username, "ann1");
    assert!(created.available_times.is_empty());
    assert!(created.joined_events.is_empty());

    let fetched = rt.block_on(logic::get_user(db, created.id)).unwrap();
    assert_eq!(fetched, created);
}

#[test]
#[ignore]
fn absent_fields_fall_back_to_their_defaults() {
    let (mut rt, db) = connect();
    let user = rt
        .block_on(logic::create_user(db.clone(), None, None))
        .unwrap();
    assert_eq!(user.name, "");
    assert_eq!(user.username, "");

    let time = rt
        .block_on(logic::create_time(db, user.id, None, None))
        .unwrap();
    assert_eq!(time.weekday, 0);
    assert_eq!(time.timeslot, "");
}

#[test]
#[ignore]
fn time_under_an_unknown_user_is_rejected() {
    let (mut rt, db) = connect();
    let ghost = vanished_user(&mut rt, &db);
    let result = rt.block_on(logic::create_time(
        db,
        ghost,
        Some(2),
        Some("10am-11am".to_owned()),
    ));
    assert_not_found(result, "User");
}

#[test]
#[ignore]
fn deleting_a_time_is_scoped_to_its_owner() {
    let (mut rt, db) = connect();
    let ann = create_user(&mut rt, &db, "Ann", "ann1");
    let bob = create_user(&mut rt, &db, "Bob", "bob1");
    let time = rt
        .block_on(logic::create_time(
            db.clone(),
            ann.id,
            Some(3),
            Some("1pm-2pm".to_owned()),
        ))
        .unwrap();
    assert_eq!(time.user_id, ann.id);

    let result = rt.block_on(logic::delete_time(db.clone(), bob.id, time.id));
    assert_not_found(result, "Timeslot");

    let fetched = rt.block_on(logic::get_user(db.clone(), ann.id)).unwrap();
    assert_eq!(fetched.available_times.len(), 1);

    let deleted = rt
        .block_on(logic::delete_time(db.clone(), ann.id, time.id))
        .unwrap();
    assert_eq!(deleted, time);
    let fetched = rt.block_on(logic::get_user(db, ann.id)).unwrap();
    assert!(fetched.available_times.is_empty());
}

#[test]
#[ignore]
fn deleting_a_user_cascades_to_its_times() {
    let (mut rt, db) = connect();
    let ann = create_user(&mut rt, &db, "Ann", "ann1");
    let time = rt
        .block_on(logic::create_time(
            db.clone(),
            ann.id,
            Some(4),
            Some("3pm-4pm".to_owned()),
        ))
        .unwrap();

    let gone = rt
        .block_on(logic::delete_user(db.clone(), ann.id))
        .unwrap();
    assert_eq!(gone.available_times.len(), 1);

    assert_not_found(rt.block_on(logic::get_user(db.clone(), ann.id)), "User");
    assert_not_found(rt.block_on(logic::delete_time(db, ann.id, time.id)), "Timeslot");
}

#[test]
#[ignore]
fn events_converge_by_description() {
    let (mut rt, db) = connect();
    let ann = create_user(&mut rt, &db, "Ann", "ann1");
    let bob = create_user(&mut rt, &db, "Bob", "bob1");
    let description = unique("study group");

    let first = rt
        .block_on(logic::create_event(
            db.clone(),
            ann.id,
            Some(description.clone()),
            None,
        ))
        .unwrap();
    let second = rt
        .block_on(logic::create_event(
            db.clone(),
            bob.id,
            Some(description.clone()),
            None,
        ))
        .unwrap();
    assert_eq!(first.id, second.id);

    let members = second.users.iter().map(|user| user.id).collect::<Vec<_>>();
    assert!(members.contains(&ann.id));
    assert!(members.contains(&bob.id));

    // joining again must not duplicate the membership
    let third = rt
        .block_on(logic::create_event(
            db,
            ann.id,
            Some(description),
            Some(vec![ann.id, bob.id]),
        ))
        .unwrap();
    assert_eq!(third.users.len(), second.users.len());
}

#[test]
#[ignore]
fn an_unknown_guest_fails_the_whole_event() {
    let (mut rt, db) = connect();
    let ann = create_user(&mut rt, &db, "Ann", "ann1");
    let ghost = vanished_user(&mut rt, &db);
    let description = unique("ghost party");

    let result = rt.block_on(logic::create_event(
        db.clone(),
        ann.id,
        Some(description.clone()),
        Some(vec![ghost]),
    ));
    assert_not_found(result, "User");

    // the failed attempt committed nothing, so the event starts from an empty roster
    let event = rt
        .block_on(logic::create_event(db, ann.id, Some(description), None))
        .unwrap();
    assert_eq!(event.users.len(), 1);
    assert_eq!(event.users[0].id, ann.id);
}

#[test]
#[ignore]
fn serialization_stops_after_one_level() {
    let (mut rt, db) = connect();
    let ann = create_user(&mut rt, &db, "Ann", "ann1");
    let description = unique("book club");
    let _ = rt
        .block_on(logic::create_event(db.clone(), ann.id, Some(description), None))
        .unwrap();

    let fetched = rt.block_on(logic::get_user(db, ann.id)).unwrap();
    let value = serde_json::to_value(&fetched).unwrap();
    let embedded = &value["joined_events"][0]["users"][0];
    assert_eq!(embedded["id"], serde_json::json!(ann.id));
    assert!(embedded.get("joined_events").is_none());
}
