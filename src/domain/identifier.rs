use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated string containing only ASCII letters ([A-Za-z]+).
///
/// Used for the leading segment of a chapter token (the `V` in `V14`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix(NonEmptyString);

impl Prefix {
    /// Creates a new `Prefix` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPrefixError` if the string is empty or contains
    /// characters other than ASCII letters.
    pub fn new(s: String) -> Result<Self, InvalidPrefixError> {
        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(InvalidPrefixError(s));
        }

        NonEmptyString::new(s).map(Self).map_err(InvalidPrefixError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for Prefix {
    type Error = InvalidPrefixError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl Deref for Prefix {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a chapter prefix is not made of ASCII letters.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid chapter prefix '{0}': must be non-empty and contain only letters")]
pub struct InvalidPrefixError(String);

/// Errors that can occur while decomposing an identifier token.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The token does not have the expected dotted structure.
    #[error("Malformed identifier '{0}': {1}")]
    Syntax(String, &'static str),

    /// A numeric component could not be parsed.
    #[error("Malformed identifier '{0}': expected a number, got '{1}'")]
    Number(String, String),

    /// The chapter prefix is missing or invalid.
    #[error(transparent)]
    Prefix(#[from] InvalidPrefixError),
}

fn parse_number(token: &str, part: &str) -> Result<u32, Error> {
    // `u32::from_str` accepts a leading '+', which never appears in a token
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Number(token.to_string(), part.to_string()));
    }
    part.parse()
        .map_err(|_| Error::Number(token.to_string(), part.to_string()))
}

/// Identifier of a chapter, e.g. `V14`.
///
/// The displayed form is derived from the prefix and number only, so `V01`
/// and `V1` denote the same chapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChapterId {
    prefix: Prefix,
    number: u32,
}

impl ChapterId {
    /// Creates a chapter identifier from pre-validated parts.
    #[must_use]
    pub const fn new(prefix: Prefix, number: u32) -> Self {
        Self { prefix, number }
    }

    /// The alphabetic prefix.
    #[must_use]
    pub const fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// The chapter number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.number)
    }
}

impl FromStr for ChapterId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::Syntax(s.to_string(), "no numeric suffix"))?;
        let (prefix, digits) = s.split_at(split);

        let prefix = Prefix::try_from(prefix)?;
        let number = parse_number(s, digits)?;

        Ok(Self::new(prefix, number))
    }
}

/// Identifier of a section, e.g. `V14.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId {
    chapter: ChapterId,
    number: u32,
}

impl SectionId {
    /// Creates a section identifier from its parts.
    #[must_use]
    pub const fn new(chapter: ChapterId, number: u32) -> Self {
        Self { chapter, number }
    }

    /// The chapter part of the token.
    #[must_use]
    pub const fn chapter(&self) -> &ChapterId {
        &self.chapter
    }

    /// The section number (the part after the first `.`).
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.number)
    }
}

impl FromStr for SectionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chapter, number) = s
            .split_once('.')
            .ok_or_else(|| Error::Syntax(s.to_string(), "expected '<chapter>.<section>'"))?;

        let chapter = chapter.parse()?;
        let number = parse_number(s, number)?;

        Ok(Self::new(chapter, number))
    }
}

/// Identifier of a requirement, e.g. `V14.2.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequirementId {
    section: SectionId,
    number: u32,
}

impl RequirementId {
    /// Creates a requirement identifier from its parts.
    #[must_use]
    pub const fn new(section: SectionId, number: u32) -> Self {
        Self { section, number }
    }

    /// The section part of the token.
    #[must_use]
    pub const fn section(&self) -> &SectionId {
        &self.section
    }

    /// The requirement number (the last dotted component).
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.number)
    }
}

impl FromStr for RequirementId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.split('.').count() != 3 {
            return Err(Error::Syntax(
                s.to_string(),
                "expected '<chapter>.<section>.<requirement>'",
            ));
        }

        let (section, number) = s
            .rsplit_once('.')
            .ok_or_else(|| Error::Syntax(s.to_string(), "missing requirement number"))?;

        let section = section.parse()?;
        let number = parse_number(s, number)?;

        Ok(Self::new(section, number))
    }
}
