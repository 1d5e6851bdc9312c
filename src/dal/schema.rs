table! {
    events (id) {
        id -> Int4,
        description -> Varchar,
    }
}

table! {
    memberships (user_id, event_id) {
        user_id -> Int4,
        event_id -> Int4,
    }
}

table! {
    times (id) {
        id -> Int4,
        weekday -> Int4,
        timeslot -> Varchar,
        user_id -> Int4,
    }
}

table! {
    users (id) {
        id -> Int4,
        name -> Varchar,
        username -> Varchar,
    }
}

joinable!(memberships -> events (event_id));
joinable!(memberships -> users (user_id));
joinable!(times -> users (user_id));

allow_tables_to_appear_in_same_query!(
    events,
    memberships,
    times,
    users,
);
