use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by the admin cleanup trigger.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CleanupReport {
    pub removed_records: u64,
    pub removed_files: u64,
}
