//! Drafts import routing.
//!
//! Markdown drafts dropped into the drafts folder are parsed, scored against
//! the niche keyword table and queued for an editor to approve.

pub mod frontmatter;
pub mod pending;
pub mod routing;

pub use frontmatter::{parse_draft, Frontmatter, FrontmatterValue, ParsedDraft};
pub use pending::{scan_drafts_dir, ContentError, ImportStatus, PendingImport, PendingImports};
pub use routing::{Category, CategoryRouter, CategoryScore, RoutingRecommendation};
