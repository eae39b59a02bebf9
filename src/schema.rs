diesel::table! {
    appointments (id) {
        id -> Int4,
        name -> Text,
        email -> Text,
        date -> Text,
        time -> Text,
        created_at -> Timestamptz,
    }
}
