use crate::domain::identifier::{ChapterId, Error};

/// Top-level grouping of the standard, e.g. `V2 Authentication`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    name: String,
}

impl Chapter {
    /// Construct a chapter from its raw identifier token and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a letter prefix followed by a
    /// number.
    pub fn new(token: &str, name: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::from_id(token.parse()?, name))
    }

    pub(crate) fn from_id(id: ChapterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The parsed identifier.
    #[must_use]
    pub const fn id(&self) -> &ChapterId {
        &self.id
    }

    /// The chapter number (`2` for `V2`).
    #[must_use]
    pub const fn numeric_id(&self) -> u32 {
        self.id.number()
    }

    /// The chapter's unique identifier, e.g. `V2`.
    #[must_use]
    pub fn unique_id(&self) -> String {
        self.id.to_string()
    }

    /// The chapter title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
