mod combined;
mod custom;

pub use combined::CombinedLogFormat;
pub use custom::CustomLogFormat;

fn non_empty(s: &str) -> Option<String> {
    match s.trim() {
        "" | "-" => None,
        s => Some(s.to_string()),
    }
}
