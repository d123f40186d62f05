//! Domain model of the standard.
//!
//! This module contains the entity types (chapters, sections and
//! requirements), their identifier tokens, and the assembler that builds the
//! hierarchy from flat rows.

mod assembler;
pub use assembler::{Assembler, BuildError};

mod chapter;
pub use chapter::Chapter;

mod config;
pub use config::Config;

/// Identifier tokens and their parsing.
pub mod identifier;
pub use identifier::{ChapterId, Error as IdentifierError, RequirementId, SectionId};

mod level;
pub use level::{InvalidLevelError, Level, Levels};

mod requirement;
pub use requirement::Requirement;

mod row;
pub use row::{Field, MissingFieldError, RawRow};

mod section;
pub use section::Section;

mod standard;
pub use standard::{AncestorError, ChapterIndex, SectionIndex, Standard};

mod view;
pub use view::{RequirementView, SectionView};
