pub mod primer_window;
pub mod result_writer;
pub mod sequence_analysis;

pub use primer_window::build_primer_pair;
pub use result_writer::ResultWriter;
pub use sequence_analysis::{
    AnchorParams, GcWindowAnalyzer, SequenceAnalyzer, SequenceRecord, SequenceStats,
};
