//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Projects referenced by tasks. Owned by the project service.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Users tasks may be assigned to. Owned by the user service.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Lowercased description, unique via `idx_tasks_description_unique`.
        description -> Text,
        /// Task status.
        #[max_length = 50]
        status -> Varchar,
        /// Normalised due date.
        due_date -> Timestamptz,
        /// Owning project.
        project_id -> Uuid,
        /// Assigned user, if any.
        assigned_to_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::joinable!(tasks -> users (assigned_to_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks, users);
