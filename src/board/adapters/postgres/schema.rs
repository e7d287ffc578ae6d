//! Diesel schema for board persistence.

diesel::table! {
    /// Per-project board revision, locked by every writer.
    project_boards (project_id) {
        /// Owning project.
        project_id -> Int8,
        /// Number of committed board changes.
        revision -> Int8,
        /// Time of the last committed change.
        modified_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Ordered columns of a project.
    board_columns (id) {
        /// Column identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Column title.
        #[max_length = 50]
        title -> Varchar,
        /// One-based position within the project.
        position -> Int4,
        /// Advisory task limit; zero means unlimited.
        task_limit -> Int4,
    }
}

diesel::table! {
    /// Stored swimlanes; the default swimlane is implicit.
    swimlanes (id) {
        /// Swimlane identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Swimlane name.
        #[max_length = 200]
        name -> Varchar,
        /// Rank among the project's stored swimlanes.
        position -> Int4,
    }
}

diesel::table! {
    /// Board placement of tasks.
    board_tasks (id) {
        /// Task identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Column holding the task.
        column_id -> Int8,
        /// Swimlane holding the task; zero for the default swimlane.
        swimlane_id -> Int8,
        /// One-based position within the bucket.
        position -> Int4,
        /// Task title.
        title -> Text,
        /// Whether the task is open.
        is_active -> Bool,
    }
}
