mod replay;
pub mod tracing;

pub use replay::{LogFixture, RunReport, run_to_completion};
pub use self::tracing::{CapturedEvent, init_test_tracing};
