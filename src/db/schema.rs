diesel::table! {
    branches (id) {
        id -> Uuid,
        name -> Varchar,
        code -> Varchar,
        is_active -> Bool,
        coming_soon -> Bool,
    }
}

diesel::table! {
    semesters (id) {
        id -> Uuid,
        number -> Int4,
        branch_id -> Uuid,
    }
}

diesel::table! {
    subjects (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        semester_id -> Uuid,
        branch_id -> Uuid,
    }
}

diesel::table! {
    lecturers (id) {
        id -> Uuid,
        name -> Varchar,
        title -> Varchar,
        institution -> Varchar,
        image_url -> Nullable<Varchar>,
    }
}

diesel::table! {
    videos (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        youtube_id -> Varchar,
        duration -> Int4,
        subject_id -> Uuid,
        lecturer_id -> Uuid,
        published_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        username -> Varchar,
        password_hash -> Varchar,
        role -> Varchar,
    }
}

diesel::joinable!(semesters -> branches (branch_id));
diesel::joinable!(subjects -> semesters (semester_id));
diesel::joinable!(videos -> subjects (subject_id));
diesel::joinable!(videos -> lecturers (lecturer_id));

diesel::allow_tables_to_appear_in_same_query!(
    branches, semesters, subjects, lecturers, videos, users,
);
