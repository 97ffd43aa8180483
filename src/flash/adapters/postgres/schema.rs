//! Diesel schema for flash message persistence.

diesel::table! {
    /// Flash messages addressed to a session and/or user.
    flash_messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Owning user, if any.
        user_id -> Nullable<Uuid>,
        /// Session the message was submitted in, if any.
        #[max_length = 64]
        session_key -> Nullable<Varchar>,
        /// View the message was submitted from.
        #[max_length = 64]
        view -> Varchar,
        /// Message text.
        #[max_length = 1024]
        message -> Varchar,
        /// Numeric severity.
        level -> Int4,
        /// When the message was read.
        read_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Free-text tags attached to flash messages.
    flash_message_tags (id) {
        /// Surrogate key.
        id -> Int8,
        /// Tagged message.
        message_id -> Uuid,
        /// Tag text.
        #[max_length = 128]
        text -> Varchar,
    }
}

diesel::joinable!(flash_message_tags -> flash_messages (message_id));
diesel::allow_tables_to_appear_in_same_query!(flash_messages, flash_message_tags);
