//! OWASP Application Security Verification Standard
//!
//! The standard is published as a flat table, one requirement per row. This
//! crate assembles those rows into chapters, sections and requirements.

pub mod domain;
pub use domain::{
    BuildError, Chapter, Config, Level, Levels, RawRow, Requirement, RequirementView, Section,
    SectionView, Standard,
};

/// Reading the standard from CSV.
pub mod storage;
pub use storage::LoadError;
