//! Assembly of the Chapter → Section → Requirement tree from flat rows.
//!
//! Every row describes one requirement and repeats the chapter and section it
//! belongs to. Chapters and sections are created the first time their
//! identifier is seen; requirements are created for every row.

use std::{borrow::Borrow, collections::HashMap};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::{
    Chapter, Config, RawRow, Requirement, Section, Standard,
    identifier::{self, ChapterId, SectionId},
    standard::{AncestorError, ChapterIndex, SectionIndex},
};

/// Errors that can occur while assembling rows into a [`Standard`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// An identifier token could not be decomposed.
    #[error(transparent)]
    MalformedIdentifier(#[from] identifier::Error),

    /// The row's entity has no valid ancestor in scope.
    #[error("{child} has no valid parent: expected {parent} in scope")]
    MissingParent {
        /// Identifier token of the entity being attached.
        child: String,
        /// Identifier token of the parent it refers to.
        parent: String,
    },

    /// A parent link could not be established.
    #[error(transparent)]
    Ancestor(#[from] AncestorError),
}

/// Builds a [`Standard`] one row at a time.
///
/// Sections are tracked per chapter, so a section token is never merged with
/// a section of another chapter.
#[derive(Debug)]
pub struct Assembler<'c> {
    config: &'c Config,
    standard: Standard,
    chapters: HashMap<ChapterId, ChapterIndex>,
    sections: HashMap<(ChapterId, SectionId), SectionIndex>,
    current_section: Option<SectionIndex>,
}

impl<'c> Assembler<'c> {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            standard: Standard::default(),
            chapters: HashMap::new(),
            sections: HashMap::new(),
            current_section: None,
        }
    }

    /// Adds one row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    ///
    /// - an identifier token is malformed
    /// - the section token does not belong to the row's chapter
    /// - the requirement token does not belong to the row's section
    /// - the row returns to an earlier section and
    ///   [`Config::allow_interleaved_sections`] is `false`
    pub fn push(&mut self, row: &RawRow) -> Result<(), BuildError> {
        let chapter_id: ChapterId = row.chapter_id.parse()?;
        let chapter = match self.chapters.get(&chapter_id) {
            Some(&index) => index,
            None => self.add_chapter(chapter_id.clone(), &row.chapter_name),
        };

        let section_id: SectionId = row.section_id.parse()?;
        if section_id.chapter() != &chapter_id {
            return Err(BuildError::MissingParent {
                child: section_id.to_string(),
                parent: section_id.chapter().to_string(),
            });
        }

        let key = (chapter_id, section_id);
        let section = match self.sections.get(&key).copied() {
            None => {
                let index = self.add_section(key, &row.section_name, chapter)?;
                self.current_section = Some(index);
                index
            }
            Some(index) if self.current_section == Some(index) => index,
            Some(index) if self.config.allow_interleaved_sections => {
                warn!(section = %key.1, requirement = %row.req_id, "returning to an earlier section");
                self.current_section = Some(index);
                index
            }
            Some(_) => {
                return Err(BuildError::MissingParent {
                    child: row.req_id.clone(),
                    parent: key.1.to_string(),
                });
            }
        };

        self.add_requirement(row, section)
    }

    /// Finishes assembly, returning the standard.
    #[must_use]
    pub fn finish(self) -> Standard {
        self.standard
    }

    fn add_chapter(&mut self, id: ChapterId, name: &str) -> ChapterIndex {
        debug!(chapter = %id, "new chapter");
        let index = self
            .standard
            .push_chapter(Chapter::from_id(id.clone(), name));
        self.chapters.insert(id, index);
        index
    }

    fn add_section(
        &mut self,
        key: (ChapterId, SectionId),
        name: &str,
        chapter: ChapterIndex,
    ) -> Result<SectionIndex, BuildError> {
        debug!(section = %key.1, "new section");
        let index = self
            .standard
            .push_section(Section::from_id(key.1.clone(), name), chapter)?;
        self.sections.insert(key, index);
        Ok(index)
    }

    fn add_requirement(&mut self, row: &RawRow, section: SectionIndex) -> Result<(), BuildError> {
        let requirement = Requirement::new(
            &row.req_id,
            &row.req_description,
            row.markers(),
            self.config.level_marker(),
        )?
        .with_mappings(&row.cwe, &row.nist);

        let owner = self
            .standard
            .section(section)
            .ok_or_else(|| AncestorError::NotResolved(row.req_id.clone()))?;
        if requirement.id().section() != owner.id() {
            return Err(BuildError::MissingParent {
                child: requirement.id().to_string(),
                parent: requirement.id().section().to_string(),
            });
        }

        self.standard.push_requirement(requirement, section)?;
        Ok(())
    }
}

impl Standard {
    /// Assemble a standard from a sequence of rows.
    ///
    /// An empty sequence yields an empty standard.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered; no partial standard is
    /// returned.
    #[instrument(skip_all)]
    pub fn from_rows<I>(rows: I, config: &Config) -> Result<Self, BuildError>
    where
        I: IntoIterator,
        I::Item: Borrow<RawRow>,
    {
        let mut assembler = Assembler::new(config);
        for row in rows {
            assembler.push(row.borrow())?;
        }
        let standard = assembler.finish();
        debug!(
            chapters = standard.chapters.len(),
            sections = standard.sections.len(),
            requirements = standard.requirements.len(),
            "assembled standard"
        );
        Ok(standard)
    }
}
