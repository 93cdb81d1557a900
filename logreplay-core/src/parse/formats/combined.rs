use super::non_empty;
use crate::error::ParseError;
use crate::parse::{LogEntry, LogFormat};
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

const TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

static COMBINED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^(?:(?P<vhost>\S+) )?(?P<host>\S+) \S+ \S+ \[(?P<time>[^\]]+)\] "#,
        r#""(?P<request>[^"]*)" (?P<code>\d{3}) (?P<size>\d+|-)"#,
        r#"(?: "(?P<referrer>[^"]*)" "(?P<agent>[^"]*)")?"#,
    ))
    .expect("combined log pattern is valid")
});

/// NCSA common/combined access log, optionally prefixed with a virtual host
/// (`%v %h %l %u %t "%r" %>s %b "%{Referer}i" "%{User-agent}i"`).
#[derive(Debug, Default)]
pub struct CombinedLogFormat;

impl LogFormat for CombinedLogFormat {
    fn name(&self) -> &'static str {
        "combined"
    }

    fn parse_line(&self, line: &str) -> Result<LogEntry, ParseError> {
        let caps = COMBINED_LINE.captures(line).ok_or(ParseError::NoMatch {
            format: self.name(),
        })?;

        let time = &caps["time"];
        let timestamp = DateTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| ParseError::InvalidTimestamp {
                value: time.to_string(),
            })?
            .timestamp();

        // "GET /index.html HTTP/1.1"; malformed requests keep whatever is there
        let mut request = caps["request"].split_whitespace();
        let (method, path) = match (request.next(), request.next()) {
            (Some(method), Some(path)) => (Some(method.to_string()), path.to_string()),
            (Some(path), None) => (None, path.to_string()),
            _ => {
                return Err(ParseError::NoMatch {
                    format: self.name(),
                });
            }
        };

        let code = &caps["code"];
        let response_code = code
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidResponseCode {
                value: code.to_string(),
            })?;

        let size = match &caps["size"] {
            "-" => 0,
            s => s.parse::<u64>().map_err(|_| ParseError::InvalidSize {
                value: s.to_string(),
            })?,
        };

        Ok(LogEntry {
            timestamp,
            hostname: caps["host"].to_string(),
            path,
            vhost: caps
                .name("vhost")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            pid: String::new(),
            method,
            response_code,
            successful: LogEntry::is_success_code(response_code),
            size,
            referrer: caps.name("referrer").and_then(|m| non_empty(m.as_str())),
            user_agent: caps.name("agent").and_then(|m| non_empty(m.as_str())),
            colour: None,
        })
    }
}
