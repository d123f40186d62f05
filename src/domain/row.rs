use std::{collections::HashMap, fmt};

/// A named column of the tabular standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Chapter identifier token, e.g. `V2`.
    ChapterId,
    /// Chapter title.
    ChapterName,
    /// Section identifier token, e.g. `V2.1`.
    SectionId,
    /// Section title.
    SectionName,
    /// Requirement identifier token, e.g. `V2.1.1`.
    RequirementId,
    /// Requirement text, possibly ending in a reference link.
    RequirementDescription,
    /// Level 1 marker.
    Level1,
    /// Level 2 marker.
    Level2,
    /// Level 3 marker.
    Level3,
    /// CWE mapping.
    Cwe,
    /// NIST mapping.
    Nist,
}

impl Field {
    /// Every field, in the column order of the published export.
    pub const ALL: [Self; 11] = [
        Self::ChapterId,
        Self::ChapterName,
        Self::SectionId,
        Self::SectionName,
        Self::RequirementId,
        Self::RequirementDescription,
        Self::Level1,
        Self::Level2,
        Self::Level3,
        Self::Cwe,
        Self::Nist,
    ];

    /// The column header naming this field.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::ChapterId => "chapter_id",
            Self::ChapterName => "chapter_name",
            Self::SectionId => "section_id",
            Self::SectionName => "section_name",
            Self::RequirementId => "req_id",
            Self::RequirementDescription => "req_description",
            Self::Level1 => "level1",
            Self::Level2 => "level2",
            Self::Level3 => "level3",
            Self::Cwe => "cwe",
            Self::Nist => "nist",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Error returned when a row lacks a required field.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("missing field '{0}'")]
pub struct MissingFieldError(pub Field);

/// One row of the standard: a single requirement with its chapter and
/// section repeated alongside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Chapter identifier token.
    pub chapter_id: String,
    /// Chapter title.
    pub chapter_name: String,
    /// Section identifier token.
    pub section_id: String,
    /// Section title.
    pub section_name: String,
    /// Requirement identifier token.
    pub req_id: String,
    /// Raw requirement text.
    pub req_description: String,
    /// Level 1, 2 and 3 markers.
    pub levels: [String; 3],
    /// CWE mapping.
    pub cwe: String,
    /// NIST mapping.
    pub nist: String,
}

impl RawRow {
    /// Build a row by looking up each field by name.
    ///
    /// # Errors
    ///
    /// Returns the first field for which `lookup` returns `None`.
    pub fn from_fields<'a>(
        mut lookup: impl FnMut(Field) -> Option<&'a str>,
    ) -> Result<Self, MissingFieldError> {
        let mut get = |field: Field| {
            lookup(field)
                .map(str::to_string)
                .ok_or(MissingFieldError(field))
        };

        Ok(Self {
            chapter_id: get(Field::ChapterId)?,
            chapter_name: get(Field::ChapterName)?,
            section_id: get(Field::SectionId)?,
            section_name: get(Field::SectionName)?,
            req_id: get(Field::RequirementId)?,
            req_description: get(Field::RequirementDescription)?,
            levels: [get(Field::Level1)?, get(Field::Level2)?, get(Field::Level3)?],
            cwe: get(Field::Cwe)?,
            nist: get(Field::Nist)?,
        })
    }

    /// The three level markers as string slices.
    #[must_use]
    pub fn markers(&self) -> [&str; 3] {
        [
            self.levels[0].as_str(),
            self.levels[1].as_str(),
            self.levels[2].as_str(),
        ]
    }
}

impl<S: std::hash::BuildHasher> TryFrom<&HashMap<String, String, S>> for RawRow {
    type Error = MissingFieldError;

    fn try_from(map: &HashMap<String, String, S>) -> Result<Self, Self::Error> {
        Self::from_fields(|field| map.get(field.header()).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HashMap<String, String> {
        Field::ALL
            .into_iter()
            .map(|field| (field.header().to_string(), format!("<{field}>")))
            .collect()
    }

    #[test]
    fn from_map() {
        let row = RawRow::try_from(&full_map()).unwrap();
        assert_eq!(row.chapter_id, "<chapter_id>");
        assert_eq!(row.req_description, "<req_description>");
        assert_eq!(row.markers(), ["<level1>", "<level2>", "<level3>"]);
        assert_eq!(row.nist, "<nist>");
    }

    #[test]
    fn missing_field() {
        let mut map = full_map();
        map.remove("level2");

        let error = RawRow::try_from(&map).unwrap_err();
        assert_eq!(error, MissingFieldError(Field::Level2));
        assert_eq!(error.to_string(), "missing field 'level2'");
    }

    #[test]
    fn informational_fields_are_required() {
        let mut map = full_map();
        map.remove("cwe");
        assert_eq!(
            RawRow::try_from(&map).unwrap_err(),
            MissingFieldError(Field::Cwe)
        );
    }
}
