pub mod column;
pub mod loaders;
pub mod primer;
pub mod result;
pub mod row;

pub use column::Column;
pub use loaders::{delimiter_for, load_table};
pub use primer::{CaptureAnchor, Primer, PrimerPair, WindowPolicy};
pub use result::{AllResult, RowResult, Status};
pub use row::InputRow;
