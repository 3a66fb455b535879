diesel::table! {
    clean_run (id) {
        id -> Integer,
        timestamp -> Timestamp,
        dry_run -> Bool,
        log_file -> Nullable<Text>,
        backup_file -> Nullable<Text>,
    }
}
