pub mod latex;
pub mod register;
pub mod scan;
pub mod typeset;

pub use latex::{RenderError, Written, write_reports};
pub use register::{Register, RegisterError, SyncSummary, sync};
pub use scan::scan_documents;
pub use typeset::{Compiler, TypesetError, Typesetter};
