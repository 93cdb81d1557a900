use super::non_empty;
use crate::conf::Rgb;
use crate::error::ParseError;
use crate::parse::{LogEntry, LogFormat};

const REQUIRED_FIELDS: usize = 5;

/// Pipe-delimited custom log:
///
/// ```text
/// timestamp|hostname|path|response_code|response_size[|success|colour|referrer|user_agent|vhost|pid]
/// ```
///
/// `success` is `1`/`0` (or `true`/`false`) and overrides the status-code
/// rule; `colour` is `RRGGBB`.
#[derive(Debug, Default)]
pub struct CustomLogFormat;

impl LogFormat for CustomLogFormat {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn parse_line(&self, line: &str) -> Result<LogEntry, ParseError> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < REQUIRED_FIELDS {
            return Err(ParseError::MissingFields {
                expected: REQUIRED_FIELDS,
                found: fields.len(),
            });
        }

        let timestamp =
            fields[0]
                .trim()
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidTimestamp {
                    value: fields[0].to_string(),
                })?;

        let hostname = fields[1].trim();
        let path = fields[2].trim();
        if hostname.is_empty() || path.is_empty() {
            return Err(ParseError::NoMatch {
                format: self.name(),
            });
        }

        let response_code =
            fields[3]
                .trim()
                .parse::<u16>()
                .map_err(|_| ParseError::InvalidResponseCode {
                    value: fields[3].to_string(),
                })?;

        let size = match fields[4].trim() {
            "" | "-" => 0,
            s => s.parse::<u64>().map_err(|_| ParseError::InvalidSize {
                value: s.to_string(),
            })?,
        };

        let field = |i: usize| fields.get(i).copied().unwrap_or("");

        let successful = match field(5).trim() {
            "1" | "true" => true,
            "0" | "false" => false,
            _ => LogEntry::is_success_code(response_code),
        };

        Ok(LogEntry {
            timestamp,
            hostname: hostname.to_string(),
            path: path.to_string(),
            vhost: field(9).trim().to_string(),
            pid: field(10).trim().to_string(),
            method: None,
            response_code,
            successful,
            size,
            referrer: non_empty(field(7)),
            user_agent: non_empty(field(8)),
            colour: field(6).parse::<Rgb>().ok(),
        })
    }
}
