//! The assembled, in-memory standard.
//!
//! The [`Standard`] knows nothing about where its rows came from. Entities
//! are stored in three arenas; parent links are indices into the previous
//! arena, so every section and requirement can be resolved to its full
//! ancestry.

use thiserror::Error;

use crate::domain::{Chapter, Requirement, RequirementView, Section, SectionView};

/// Position of a chapter in [`Standard::chapters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChapterIndex(pub(crate) usize);

/// Position of a section in [`Standard::sections`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionIndex(pub(crate) usize);

/// Errors relating to an entity's parent link.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AncestorError {
    /// The unique id was requested before the parent was resolved.
    #[error("ancestor of {0} has not been resolved")]
    NotResolved(String),

    /// The entity already belongs to a different parent.
    #[error("{child} is already attached to a different parent")]
    AlreadyAttached {
        /// Identifier token of the child entity.
        child: String,
    },
}

/// Chapters, sections and requirements of the standard, in source order.
///
/// A `Standard` is built by the [`Assembler`](crate::domain::Assembler) and is
/// immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standard {
    pub(crate) chapters: Vec<Chapter>,
    pub(crate) sections: Vec<Section>,
    pub(crate) requirements: Vec<Requirement>,
}

impl Standard {
    /// All chapters, in order of first appearance.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// All sections with their chapters, in order of first appearance.
    pub fn sections(&self) -> impl Iterator<Item = SectionView<'_>> + '_ {
        self.sections.iter().filter_map(|section| {
            let chapter = self.chapter(section.chapter()?)?;
            Some(SectionView { section, chapter })
        })
    }

    /// All requirements with their section and chapter, in row order.
    pub fn requirements(&self) -> impl Iterator<Item = RequirementView<'_>> + '_ {
        self.requirements.iter().filter_map(|requirement| {
            let section = self.section(requirement.section()?)?;
            let chapter = self.chapter(section.chapter()?)?;
            Some(RequirementView {
                requirement,
                section,
                chapter,
            })
        })
    }

    /// Look up a chapter by index.
    #[must_use]
    pub fn chapter(&self, index: ChapterIndex) -> Option<&Chapter> {
        self.chapters.get(index.0)
    }

    /// Look up a section by index.
    #[must_use]
    pub fn section(&self, index: SectionIndex) -> Option<&Section> {
        self.sections.get(index.0)
    }

    /// Number of requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether the standard holds no requirements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Split the standard into its three collections.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Chapter>, Vec<Section>, Vec<Requirement>) {
        (self.chapters, self.sections, self.requirements)
    }

    pub(crate) fn push_chapter(&mut self, chapter: Chapter) -> ChapterIndex {
        self.chapters.push(chapter);
        ChapterIndex(self.chapters.len() - 1)
    }

    pub(crate) fn push_section(
        &mut self,
        mut section: Section,
        chapter: ChapterIndex,
    ) -> Result<SectionIndex, AncestorError> {
        section.attach(chapter)?;
        self.sections.push(section);
        Ok(SectionIndex(self.sections.len() - 1))
    }

    pub(crate) fn push_requirement(
        &mut self,
        mut requirement: Requirement,
        section: SectionIndex,
    ) -> Result<(), AncestorError> {
        requirement.attach(section)?;
        self.requirements.push(requirement);
        Ok(())
    }
}
