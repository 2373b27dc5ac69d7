//! Diesel schema for identity persistence.

diesel::table! {
    /// Manager accounts.
    managers (id) {
        /// Manager identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Unique lowercase email.
        email -> Varchar,
        /// Encoded credential hash.
        credential -> Text,
        /// Account role.
        role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Employee records owned by managers.
    employees (id) {
        /// Employee identifier.
        id -> Uuid,
        /// Human-readable employee code.
        code -> Varchar,
        /// Owning manager identifier.
        owner_id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Unique lowercase email.
        email -> Varchar,
        /// Role or title.
        job_title -> Varchar,
        /// Optional phone number.
        mobile -> Nullable<Varchar>,
        /// Optional postal address.
        address -> Nullable<Text>,
        /// Optional salary in minor currency units.
        salary -> Nullable<Int8>,
        /// Whether the employee may authenticate.
        has_login_access -> Bool,
        /// Optional encoded credential hash.
        credential -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
