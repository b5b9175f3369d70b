// Report module - Paginated multi-column layout
// Splits the genuinely hard part (parallel column flow across a shared page
// pool) from rendering: `paginator` owns the cursor/page redirection,
// `builder` produces the content plan, `text` is one thin backend over it.

pub mod builder;
pub mod paginator;
pub mod plan;
pub mod text;

pub use builder::{NO_DATA, ReportOptions, build_batch_report, build_report};
pub use paginator::{ColumnCursor, DEFAULT_LINES_PER_PAGE, Paginator};
pub use plan::{Block, Cell, ColumnKind, Document, Page, Table, TableRow, Tone};
pub use text::render;
