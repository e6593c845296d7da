//! Domain layer for Export Guardian
//!
//! Architecture: Domain Model - export records, rule findings, and validation reports
//! - Independent of how syntax trees are produced or where reports are written

pub mod exports;
pub mod findings;
pub mod violations;

pub use exports::*;
pub use findings::*;
pub use violations::*;
