//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Trimmed task title.
        #[max_length = 255]
        title -> Varchar,
        /// Trimmed task description.
        #[max_length = 2000]
        description -> Nullable<Varchar>,
        /// Task lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Due instant, if any.
        due_at -> Nullable<Timestamptz>,
        /// UTC offset, in seconds, the due timestamp was submitted with.
        due_at_offset_seconds -> Nullable<Int4>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Claimed idempotency keys.
    idempotency_entry (id_key) {
        /// Caller-supplied idempotency key.
        #[max_length = 255]
        id_key -> Varchar,
        /// Fingerprint of the request that claimed the key.
        #[max_length = 255]
        fingerprint -> Varchar,
        /// Claim timestamp.
        created_at -> Timestamptz,
    }
}
