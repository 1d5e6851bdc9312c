//! Types used throughout.
//!
//! > Schema defines the plain old data types that views operate on. Notably, the schema module has
//! > no knowledge of the database, nor any dependencies on any of the rest of the system.
//!
//! Each entity has two output shapes: a detail shape used when the entity is the subject of a
//! response, and a summary shape used when it is reached through a relation from some other
//! entity's detail shape. Cutting over to the summary shape after one hop is what keeps the
//! mutually recursive user/event graph from expanding forever.

use serde_derive::Serialize;

/// A user.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct User {
    /// The user's database ID.
    pub id: i32,

    /// The user's display name.
    pub name: String,

    /// The user's username.
    pub username: String,
}

/// An availability timeslot. This row is also the detail shape of a timeslot.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct Time {
    /// The timeslot's database ID.
    pub id: i32,

    /// The day of the week, `0` through `6`, `0` being the first day of the week.
    pub weekday: i32,

    /// A label for the slot, e.g. an hour range.
    pub timeslot: String,

    /// The database ID of the owning user.
    pub user_id: i32,
}

/// An event.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct Event {
    /// The event's database ID.
    pub id: i32,

    /// The event's description. Events are found by description when users join them.
    pub description: String,
}

/// A timeslot as it appears inside the user that owns it; the owner is implied by context, so the
/// `user_id` column is dropped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeSummary {
    /// The timeslot's database ID.
    pub id: i32,

    /// The day of the week, `0` through `6`.
    pub weekday: i32,

    /// A label for the slot.
    pub timeslot: String,
}

impl From<Time> for TimeSummary {
    fn from(time: Time) -> TimeSummary {
        TimeSummary {
            id: time.id,
            weekday: time.weekday,
            timeslot: time.timeslot,
        }
    }
}

/// A user as the subject of a response, with its whole relational neighborhood attached.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserDetail {
    /// The user's database ID.
    pub id: i32,

    /// The user's display name.
    pub name: String,

    /// The user's username.
    pub username: String,

    /// The user's availability timeslots.
    pub available_times: Vec<TimeSummary>,

    /// The events the user has joined.
    pub joined_events: Vec<EventDetail>,
}

impl UserDetail {
    /// Assembles a user's detail shape from its parts.
    pub fn new(user: User, times: Vec<Time>, joined_events: Vec<EventDetail>) -> UserDetail {
        UserDetail {
            id: user.id,
            name: user.name,
            username: user.username,
            available_times: times.into_iter().map(TimeSummary::from).collect(),
            joined_events,
        }
    }
}

/// A user as a member of some event's roster. Omits `joined_events`, which would recurse back
/// into the event being serialized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserSummary {
    /// The user's database ID.
    pub id: i32,

    /// The user's display name.
    pub name: String,

    /// The user's username.
    pub username: String,

    /// The user's availability timeslots.
    pub available_times: Vec<TimeSummary>,
}

impl UserSummary {
    /// Assembles a user's summary shape from its parts.
    pub fn new(user: User, times: Vec<Time>) -> UserSummary {
        UserSummary {
            id: user.id,
            name: user.name,
            username: user.username,
            available_times: times.into_iter().map(TimeSummary::from).collect(),
        }
    }
}

/// An event as the subject of a response, with its members attached in summary form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventDetail {
    /// The event's database ID.
    pub id: i32,

    /// The event's description.
    pub description: String,

    /// The users who have joined the event.
    pub users: Vec<UserSummary>,
}

impl EventDetail {
    /// Assembles an event's detail shape from its parts.
    pub fn new(event: Event, users: Vec<UserSummary>) -> EventDetail {
        EventDetail {
            id: event.id,
            description: event.description,
            users,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ann() -> User {
        User {
            id: 1,
            name: "Ann".to_owned(),
            username: "ann1".to_owned(),
        }
    }

    fn monday_morning() -> Time {
        Time {
            id: 7,
            weekday: 1,
            timeslot: "9am-10am".to_owned(),
            user_id: 1,
        }
    }

    #[test]
    fn fresh_user_serializes_with_empty_collections() {
        let detail = UserDetail::new(ann(), vec![], vec![]);
        assert_eq!(
            serde_json::to_value(&detail).unwrap(),
            json!({
                "id": 1,
                "name": "Ann",
                "username": "ann1",
                "available_times": [],
                "joined_events": []
            })
        );
    }

    #[test]
    fn user_detail_includes_times_and_events_one_level_deep() {
        let event = EventDetail::new(
            Event {
                id: 3,
                description: "study group".to_owned(),
            },
            vec![UserSummary::new(ann(), vec![monday_morning()])],
        );
        let detail = UserDetail::new(ann(), vec![monday_morning()], vec![event]);
        assert_eq!(
            serde_json::to_value(&detail).unwrap(),
            json!({
                "id": 1,
                "name": "Ann",
                "username": "ann1",
                "available_times": [{ "id": 7, "weekday": 1, "timeslot": "9am-10am" }],
                "joined_events": [{
                    "id": 3,
                    "description": "study group",
                    "users": [{
                        "id": 1,
                        "name": "Ann",
                        "username": "ann1",
                        "available_times": [{ "id": 7, "weekday": 1, "timeslot": "9am-10am" }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn embedded_users_omit_their_joined_events() {
        let event = EventDetail::new(
            Event {
                id: 3,
                description: "study group".to_owned(),
            },
            vec![UserSummary::new(ann(), vec![])],
        );
        let value = serde_json::to_value(&event).unwrap();
        assert!(value["users"][0].get("joined_events").is_none());
    }

    #[test]
    fn embedded_times_omit_their_owner() {
        let value = serde_json::to_value(&TimeSummary::from(monday_morning())).unwrap();
        assert!(value.get("user_id").is_none());
        assert_eq!(
            serde_json::to_value(&monday_morning()).unwrap()["user_id"],
            json!(1)
        );
    }
}
