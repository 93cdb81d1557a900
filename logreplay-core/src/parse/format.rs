use crate::error::ParseError;
use crate::parse::LogEntry;

pub trait LogFormat: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse_line(&self, line: &str) -> Result<LogEntry, ParseError>;
}
