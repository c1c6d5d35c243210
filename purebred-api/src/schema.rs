// Mirrors `schema.sql`.

diesel::table! {
    owners (id) {
        id -> Uuid,
        name -> Text,
        #[max_length = 320]
        email -> Varchar,
        city -> Nullable<Text>,
        location_lat -> Nullable<Float8>,
        location_lng -> Nullable<Float8>,
        premium -> Bool,
        verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    pets (id) {
        id -> Uuid,
        owner_id -> Uuid,
        #[max_length = 10]
        species -> Varchar,
        name -> Text,
        breed -> Text,
        age -> Int4,
        #[max_length = 10]
        gender -> Varchar,
        pedigree -> Bool,
        photos -> Array<Text>,
        videos -> Array<Text>,
        personality -> Array<Text>,
        preferences -> Array<Text>,
        city -> Nullable<Text>,
        location_lat -> Nullable<Float8>,
        location_lng -> Nullable<Float8>,
        verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    likes (id) {
        id -> Uuid,
        liker_pet_id -> Uuid,
        target_pet_id -> Uuid,
        #[max_length = 10]
        action -> Varchar,
        created_by_owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    matches (id) {
        id -> Uuid,
        pet_a_id -> Uuid,
        pet_b_id -> Uuid,
        owner_a_id -> Uuid,
        owner_b_id -> Uuid,
        #[max_length = 80]
        pair_key -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Uuid,
        match_id -> Uuid,
        sender_pet_id -> Uuid,
        sender_owner_id -> Uuid,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    announcements (id) {
        id -> Uuid,
        owner_id -> Uuid,
        pet_id -> Nullable<Uuid>,
        #[max_length = 10]
        species -> Varchar,
        title -> Text,
        description -> Text,
        city -> Nullable<Text>,
        date -> Nullable<Date>,
        #[max_length = 20]
        kind -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    verifications (id) {
        id -> Uuid,
        pet_id -> Uuid,
        #[max_length = 20]
        kind -> Varchar,
        #[max_length = 20]
        status -> Varchar,
        document_url -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(messages -> matches (match_id));

diesel::allow_tables_to_appear_in_same_query!(
    owners,
    pets,
    likes,
    matches,
    messages,
    announcements,
    verifications,
);
