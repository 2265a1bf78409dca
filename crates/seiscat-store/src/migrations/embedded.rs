//! SQL migrations compiled into the binary, in application order

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_command_history",
        sql: include_str!("../../migrations/001_command_history.sql"),
    },
    Migration {
        id: "002_catalog",
        sql: include_str!("../../migrations/002_catalog.sql"),
    },
];
