table! {
    grounds (id) {
        id -> Int8,
        name -> Varchar,
        location -> Varchar,
        description -> Nullable<Text>,
        category -> Varchar,
        media -> Array<Text>,
        availability -> Bool,
        owner_id -> Int8,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

table! {
    slot_templates (id) {
        id -> Int8,
        ground_id -> Int8,
        start_hour -> Int2,
        end_hour -> Int2,
        price -> Int8,
        duration -> Int2,
        recurring -> Bool,
        start_date -> Date,
        frequency -> Nullable<Varchar>,
        recur_interval -> Nullable<Int4>,
        recur_until -> Nullable<Date>,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    blackouts (id) {
        id -> Int8,
        ground_id -> Int8,
        blocked_on -> Date,
        start_hour -> Int2,
        end_hour -> Int2,
        reason -> Nullable<Varchar>,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    bookings (id) {
        id -> Int8,
        ground_id -> Int8,
        slot_template_id -> Int8,
        booked_on -> Date,
        user_id -> Int8,
        status -> Varchar,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

joinable!(slot_templates -> grounds (ground_id));
joinable!(blackouts -> grounds (ground_id));
joinable!(bookings -> grounds (ground_id));
joinable!(bookings -> slot_templates (slot_template_id));

allow_tables_to_appear_in_same_query!(grounds, slot_templates, blackouts, bookings,);
