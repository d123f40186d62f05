use crate::domain::{
    Chapter, Standard,
    identifier::{Error, SectionId},
    standard::{AncestorError, ChapterIndex},
    view::SectionView,
};

/// A grouping of requirements within a chapter, e.g. `V2.1 Password Security`.
///
/// A freshly constructed section has no chapter. The owning chapter is
/// attached once, by the assembler, before the section is handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    name: String,
    chapter: Option<ChapterIndex>,
}

impl Section {
    /// Construct a section from its raw `<chapter>.<section>` token and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be split into a chapter token and
    /// a section number.
    pub fn new(token: &str, name: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::from_id(token.parse()?, name))
    }

    pub(crate) fn from_id(id: SectionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            chapter: None,
        }
    }

    /// The parsed identifier token.
    #[must_use]
    pub const fn id(&self) -> &SectionId {
        &self.id
    }

    /// The section number (`1` for `V2.1`).
    #[must_use]
    pub const fn numeric_id(&self) -> u32 {
        self.id.number()
    }

    /// The section title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the owning chapter, if it has been attached.
    #[must_use]
    pub const fn chapter(&self) -> Option<ChapterIndex> {
        self.chapter
    }

    /// Attach the owning chapter.
    ///
    /// Attaching the same chapter twice is a no-op.
    pub(crate) fn attach(&mut self, chapter: ChapterIndex) -> Result<(), AncestorError> {
        match self.chapter {
            Some(existing) if existing != chapter => Err(AncestorError::AlreadyAttached {
                child: self.id.to_string(),
            }),
            _ => {
                self.chapter = Some(chapter);
                Ok(())
            }
        }
    }

    /// The section's unique identifier, e.g. `V2.1`.
    ///
    /// # Errors
    ///
    /// Returns [`AncestorError::NotResolved`] if no chapter has been attached,
    /// or the attached index does not name this section's chapter in
    /// `standard`.
    pub fn unique_id(&self, standard: &Standard) -> Result<String, AncestorError> {
        let chapter: &Chapter = self
            .chapter
            .and_then(|index| standard.chapter(index))
            .filter(|chapter| chapter.id() == self.id.chapter())
            .ok_or_else(|| AncestorError::NotResolved(self.id.to_string()))?;

        Ok(SectionView {
            section: self,
            chapter,
        }
        .unique_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_number_after_first_separator() {
        let section = Section::new("V2.10", "Service Authentication").unwrap();
        assert_eq!(section.numeric_id(), 10);
        assert_eq!(section.id().chapter().to_string(), "V2");
        assert_eq!(section.name(), "Service Authentication");
        assert!(section.chapter().is_none());
    }

    #[test]
    fn unique_id_requires_chapter() {
        let section = Section::new("V2.1", "Password Security").unwrap();
        let error = section.unique_id(&Standard::default()).unwrap_err();
        assert_eq!(error, AncestorError::NotResolved("V2.1".to_string()));
    }

    #[test]
    fn chapter_is_never_reassigned() {
        let mut section = Section::new("V2.1", "Password Security").unwrap();
        section.attach(ChapterIndex(0)).unwrap();
        section.attach(ChapterIndex(0)).unwrap();

        let error = section.attach(ChapterIndex(1)).unwrap_err();
        assert!(matches!(error, AncestorError::AlreadyAttached { .. }));
        assert_eq!(section.chapter(), Some(ChapterIndex(0)));
    }

    #[test]
    fn malformed_token() {
        assert!(Section::new("V2", "Authentication").is_err());
    }
}
