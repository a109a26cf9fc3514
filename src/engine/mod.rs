mod classify;
mod error;
mod precheck;
mod recurrence;
mod validate;
mod window;
#[cfg(test)]
mod tests;

pub use classify::classify_space;
pub use error::{EngineError, RpcError};
pub use precheck::{commit_series, summarize, PrecheckClient, SeriesPlanner, SeriesPrecheck};
pub use recurrence::expand;
pub use validate::validate_window;
pub use window::{resolve_enter_window, slide_window, Slide};
