pub mod cancel;
pub mod result_emitter;

pub use cancel::{CancelSource, CancelToken};
pub use result_emitter::ResultEmitter;
