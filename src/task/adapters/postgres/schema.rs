//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with lifecycle and review state.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Assigning manager.
        assigned_by -> Uuid,
        /// Assignee.
        assigned_to -> Uuid,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Due date.
        deadline -> Timestamptz,
        /// Ordered attachment references.
        attachments -> Jsonb,
        /// Review feedback.
        feedback -> Nullable<Text>,
        /// Review rating.
        rating -> Nullable<Int2>,
        /// Review timestamp.
        reviewed_at -> Nullable<Timestamptz>,
        /// Optimistic concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
