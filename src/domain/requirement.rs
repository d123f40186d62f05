use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    Levels, Standard,
    identifier::{Error, RequirementId},
    standard::{AncestorError, SectionIndex},
    view::RequirementView,
};

/// Matches a reference of the form `text ([label](url))`.
///
/// The label and URL are bounded by the last `](` and the closing `))`, so
/// either may contain brackets or parentheses.
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?<text>.*?)\s*\(\[(?<label>.*)\]\((?<url>\S+)\)\)")
        .expect("link pattern is valid")
});

/// A single verifiable control, e.g. `V2.1.1`.
///
/// The owning section is attached by the assembler after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    id: RequirementId,
    description: String,
    link: Option<String>,
    levels: Levels,
    cwe: Option<String>,
    nist: Option<String>,
    section: Option<SectionIndex>,
}

impl Requirement {
    /// Construct a requirement from its raw column values.
    ///
    /// `markers` are the three level columns in order; a level applies when
    /// its column holds `marker`. A reference link embedded at the end of
    /// `raw_description` is split off into [`Requirement::link`].
    ///
    /// # Errors
    ///
    /// Returns an error if `token` is not a three-part dotted identifier.
    pub fn new(
        token: &str,
        raw_description: &str,
        markers: [&str; 3],
        marker: &str,
    ) -> Result<Self, Error> {
        let id = token.parse()?;
        let (description, link) = split_link(raw_description);

        Ok(Self {
            id,
            description,
            link,
            levels: Levels::from_markers(markers, marker),
            cwe: None,
            nist: None,
            section: None,
        })
    }

    /// Set the informational CWE and NIST mappings.
    ///
    /// Blank values are treated as absent.
    #[must_use]
    pub fn with_mappings(mut self, cwe: &str, nist: &str) -> Self {
        self.cwe = non_blank(cwe);
        self.nist = non_blank(nist);
        self
    }

    /// The parsed identifier token.
    #[must_use]
    pub const fn id(&self) -> &RequirementId {
        &self.id
    }

    /// The requirement number (`3` for `V2.1.3`).
    #[must_use]
    pub const fn numeric_id(&self) -> u32 {
        self.id.number()
    }

    /// The requirement text, without any embedded reference link.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The reference URL embedded in the original description, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// The levels this requirement applies to.
    #[must_use]
    pub const fn levels(&self) -> &Levels {
        &self.levels
    }

    /// The mapped CWE number, if any.
    #[must_use]
    pub fn cwe(&self) -> Option<&str> {
        self.cwe.as_deref()
    }

    /// The mapped NIST reference, if any.
    #[must_use]
    pub fn nist(&self) -> Option<&str> {
        self.nist.as_deref()
    }

    /// Index of the owning section, if it has been attached.
    #[must_use]
    pub const fn section(&self) -> Option<SectionIndex> {
        self.section
    }

    pub(crate) fn attach(&mut self, section: SectionIndex) -> Result<(), AncestorError> {
        match self.section {
            Some(existing) if existing != section => Err(AncestorError::AlreadyAttached {
                child: self.id.to_string(),
            }),
            _ => {
                self.section = Some(section);
                Ok(())
            }
        }
    }

    /// The requirement's unique identifier, e.g. `V2.1.3`.
    ///
    /// # Errors
    ///
    /// Returns [`AncestorError::NotResolved`] if no section has been attached,
    /// or the section (or its chapter) cannot be resolved in `standard`. An
    /// index that resolves to an entity with a different identifier counts as
    /// unresolved.
    pub fn unique_id(&self, standard: &Standard) -> Result<String, AncestorError> {
        let section = self
            .section
            .and_then(|index| standard.section(index))
            .filter(|section| section.id() == self.id.section())
            .ok_or_else(|| AncestorError::NotResolved(self.id.to_string()))?;
        let chapter = section
            .chapter()
            .and_then(|index| standard.chapter(index))
            .filter(|chapter| chapter.id() == section.id().chapter())
            .ok_or_else(|| AncestorError::NotResolved(section.id().to_string()))?;

        Ok(RequirementView {
            requirement: self,
            section,
            chapter,
        }
        .unique_id())
    }
}

/// Split a raw description into its text and optional reference link.
///
/// Without a reference the text is returned unchanged.
fn split_link(raw: &str) -> (String, Option<String>) {
    LINK.captures(raw).map_or_else(
        || (raw.to_string(), None),
        |captures| {
            (
                captures["text"].trim().to_string(),
                Some(captures["url"].to_string()),
            )
        },
    )
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
