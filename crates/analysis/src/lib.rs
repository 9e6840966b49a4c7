pub mod discovery;
pub mod structure;

pub use discovery::{find_changed_files, find_source_files};
pub use structure::{analyze_source, ClassInfo, FileAnalysis, FunctionInfo};
