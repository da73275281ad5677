pub mod table_loader;

pub use table_loader::{delimiter_for, load_table};
