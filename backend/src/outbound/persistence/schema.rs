//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Tables from the
//! `marketplace_extras` migration (`services`, `favorites`, `payments`,
//! `support_tickets`, `reports`) may be absent on older deployments; code
//! touching them probes first or treats "relation does not exist" as empty.

diesel::table! {
    /// Marketplace accounts.
    users (id) {
        id -> Uuid,
        /// Stored lowercase.
        email -> Text,
        name -> Nullable<Text>,
        username -> Nullable<Text>,
        /// `USER`, `ADMIN` or `SUPERADMIN`.
        role -> Text,
        banned -> Bool,
        suspended -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Goods for sale.
    products (id) {
        id -> Uuid,
        name -> Text,
        description -> Text,
        category -> Text,
        subcategory -> Text,
        brand -> Nullable<Text>,
        /// `brand new` or `pre-owned`.
        condition -> Nullable<Text>,
        /// Whole KES.
        price -> Nullable<Int4>,
        image -> Nullable<Text>,
        gallery -> Array<Text>,
        location -> Nullable<Text>,
        negotiable -> Bool,
        featured -> Bool,
        status -> Text,
        seller_id -> Nullable<Uuid>,
        seller_name -> Nullable<Text>,
        seller_phone -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Services on offer. Optional at runtime.
    services (id) {
        id -> Uuid,
        name -> Text,
        description -> Text,
        category -> Text,
        subcategory -> Text,
        price -> Nullable<Int4>,
        /// `hour`, `day` or `fixed`.
        rate_type -> Nullable<Text>,
        service_area -> Nullable<Text>,
        availability -> Nullable<Text>,
        image -> Nullable<Text>,
        gallery -> Array<Text>,
        location -> Nullable<Text>,
        featured -> Bool,
        status -> Text,
        seller_id -> Nullable<Uuid>,
        seller_name -> Nullable<Text>,
        seller_phone -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One carrier per user.
    carrier_profiles (id) {
        id -> Uuid,
        user_id -> Uuid,
        phone -> Nullable<Text>,
        station -> Nullable<Text>,
        planned_tier -> Text,
        status -> Text,
        suspended_until -> Nullable<Timestamptz>,
        banned_at -> Nullable<Timestamptz>,
        ban_reason -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    carrier_vehicles (id) {
        id -> Uuid,
        carrier_id -> Uuid,
        kind -> Text,
        plate -> Nullable<Text>,
    }
}

diesel::table! {
    /// Applied seed keys.
    seed_runs (seed_key) {
        seed_key -> Text,
        seed -> Int8,
        applied_at -> Timestamptz,
    }
}

diesel::table! {
    favorites (user_id, product_id) {
        user_id -> Uuid,
        product_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    payments (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        amount -> Int4,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    support_tickets (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        subject -> Text,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reports (id) {
        id -> Uuid,
        listing_id -> Uuid,
        listing_kind -> Text,
        reason -> Text,
        resolved -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(carrier_profiles -> users (user_id));
diesel::joinable!(carrier_vehicles -> carrier_profiles (carrier_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    products,
    services,
    carrier_profiles,
    carrier_vehicles,
    seed_runs,
    favorites,
    payments,
    support_tickets,
    reports,
);
