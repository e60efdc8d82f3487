//! Diesel table definitions for the marketplace schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Clients, vendors and administrators.
    profiles (id) {
        id -> Uuid,
        email -> Text,
        full_name -> Text,
        phone -> Nullable<Text>,
        /// `client`, `vendor` or `admin`.
        role -> Text,
        business_name -> Nullable<Text>,
        category -> Nullable<Text>,
        city -> Nullable<Text>,
        state -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        authorized_dealer -> Bool,
        companies -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Part requests. Exactly one of `client_id` and `vendor_id` is set.
    requests (id) {
        id -> Uuid,
        client_id -> Nullable<Uuid>,
        vendor_id -> Nullable<Uuid>,
        category -> Text,
        part_name -> Text,
        description -> Text,
        image_url -> Nullable<Text>,
        preferred_company -> Nullable<Text>,
        /// `radius`, `city`, `state` or `country`.
        area_scope -> Text,
        area_radius -> Nullable<Float8>,
        area_city -> Nullable<Text>,
        area_state -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        vendor_preference -> Text,
        status -> Text,
        created_at -> Timestamptz,
        closed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Vendor decisions, unique per `(request_id, vendor_id)`.
    request_responses (id) {
        id -> Uuid,
        request_id -> Uuid,
        vendor_id -> Uuid,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only fan-out rows.
    notifications (id) {
        id -> Uuid,
        vendor_id -> Nullable<Uuid>,
        client_id -> Nullable<Uuid>,
        responder_id -> Nullable<Uuid>,
        request_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(request_responses -> requests (request_id));
diesel::joinable!(notifications -> requests (request_id));

diesel::allow_tables_to_appear_in_same_query!(profiles, requests, request_responses, notifications);
