//! Table definitions for the tables `store` creates at startup.

diesel::table! {
    guests (code) {
        code -> Text,
        name -> Text,
        ceremony -> Bool,
        is_attending -> Nullable<Bool>,
        guest_count -> Integer,
        responded_at -> Nullable<Timestamp>,
        views -> Integer,
        created_at -> Timestamp,
        last_modified -> Nullable<Timestamp>,
    }
}

diesel::table! {
    retired_codes (code) {
        code -> Text,
    }
}

diesel::table! {
    settings (key) {
        key -> Text,
        value -> Text,
    }
}
