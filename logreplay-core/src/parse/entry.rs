use crate::conf::Rgb;
use serde::Serialize;

/// One request from the access log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogEntry {
    /// Unix seconds.
    pub timestamp: i64,

    /// Source identity (client address or name).
    pub hostname: String,

    /// Destination identity (requested URL path).
    pub path: String,

    pub vhost: String,
    pub pid: String,

    pub method: Option<String>,
    pub response_code: u16,

    /// Fixed at parse time.
    pub successful: bool,

    pub size: u64,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,

    /// Per-entry colour override from formats that carry one.
    pub colour: Option<Rgb>,
}

impl LogEntry {
    pub fn is_success_code(code: u16) -> bool {
        code < 400
    }
}
