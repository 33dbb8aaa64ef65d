//! Diesel schema for user persistence.

diesel::table! {
    /// User records keyed by internal identifier, unique per external subject.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// External identity provider subject.
        #[max_length = 255]
        external_ref -> Varchar,
        /// Current role.
        #[max_length = 50]
        role -> Varchar,
        /// Profile display name.
        #[max_length = 255]
        name -> Varchar,
        /// Profile email address.
        #[max_length = 255]
        email -> Varchar,
        /// Optional profile image URL.
        #[max_length = 255]
        image -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
