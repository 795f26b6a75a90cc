// Mirrors the DDL in `migrations.rs`.

diesel::table! {
    users (id) {
        id -> Uuid,
        username -> Text,
        password -> Text,
        created_at -> Timestamptz,
    }
}
