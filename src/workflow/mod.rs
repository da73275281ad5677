pub mod capture_flow;
pub mod row_ctx;

pub use capture_flow::{CaptureFlow, CaptureOutcome};
pub use row_ctx::RowCtx;
