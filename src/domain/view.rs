// Borrowed views pairing an entity with its resolved ancestors.

use crate::domain::{Chapter, Requirement, Section};

fn join(parent: &str, number: u32) -> String {
    format!("{parent}.{number}")
}

/// A section together with its chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionView<'a> {
    /// The section.
    pub section: &'a Section,
    /// The chapter the section belongs to.
    pub chapter: &'a Chapter,
}

impl SectionView<'_> {
    /// The section's unique identifier: the chapter's unique id, `.`, and the
    /// section number.
    #[must_use]
    pub fn unique_id(&self) -> String {
        join(&self.chapter.unique_id(), self.section.numeric_id())
    }
}

/// A requirement together with its section and chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementView<'a> {
    /// The requirement.
    pub requirement: &'a Requirement,
    /// The section the requirement belongs to.
    pub section: &'a Section,
    /// The chapter the section belongs to.
    pub chapter: &'a Chapter,
}

impl<'a> RequirementView<'a> {
    /// The owning section as a view.
    #[must_use]
    pub const fn section_view(&self) -> SectionView<'a> {
        SectionView {
            section: self.section,
            chapter: self.chapter,
        }
    }

    /// The requirement's unique identifier: the section's unique id, `.`,
    /// and the requirement number.
    #[must_use]
    pub fn unique_id(&self) -> String {
        join(
            &self.section_view().unique_id(),
            self.requirement.numeric_id(),
        )
    }
}
