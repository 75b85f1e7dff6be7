//! Table definitions.
//!
//! Migrations are managed outside this crate; these definitions describe the
//! schema the repository expects.

diesel::table! {
    stories (id) {
        id -> Int4,
        title -> Text,
        session_id -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    story_nodes (id) {
        id -> Int4,
        story_id -> Int4,
        content -> Text,
        is_root -> Bool,
        is_ending -> Bool,
        is_winning_ending -> Bool,
        options -> Jsonb,
    }
}

diesel::table! {
    story_jobs (job_id) {
        job_id -> Text,
        session_id -> Text,
        theme -> Text,
        status -> Text,
        story_id -> Nullable<Int4>,
        error -> Nullable<Text>,
        created_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(story_nodes -> stories (story_id));
diesel::joinable!(story_jobs -> stories (story_id));

diesel::allow_tables_to_appear_in_same_query!(stories, story_nodes, story_jobs);
