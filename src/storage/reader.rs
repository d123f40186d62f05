//! A CSV export of the standard.
//!
//! Columns are located by header name, so their order in the file does not
//! matter. Rows are streamed straight into the
//! [`Assembler`](crate::domain::Assembler).

use std::{
    collections::HashMap,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, instrument};

use crate::domain::{Assembler, BuildError, Config, Field, MissingFieldError, RawRow, Standard};

/// Errors that can occur while loading the standard.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source file could not be opened.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        /// Path of the source file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The source is not valid CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A row lacks a required column.
    #[error("malformed row at line {line}: {source}")]
    MalformedRow {
        /// Line of the offending record.
        line: u64,
        /// The missing column.
        source: MissingFieldError,
    },

    /// A row could not be fitted into the hierarchy.
    #[error("failed to assemble requirement '{requirement}': {source}")]
    Build {
        /// Raw identifier token of the row's requirement.
        requirement: String,
        /// The underlying assembly error.
        source: BuildError,
    },
}

/// Column positions, keyed by field.
#[derive(Debug)]
struct Columns(HashMap<Field, usize>);

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .filter_map(|(position, header)| {
                let header = header.trim_start_matches('\u{feff}').trim();
                Field::ALL
                    .into_iter()
                    .find(|field| field.header() == header)
                    .map(|field| (field, position))
            })
            .collect();
        Self(positions)
    }

    fn row(&self, record: &StringRecord) -> Result<RawRow, MissingFieldError> {
        RawRow::from_fields(|field| {
            self.0
                .get(&field)
                .and_then(|&position| record.get(position))
        })
    }
}

/// An iterator of rows read from CSV.
pub struct Rows<R> {
    reader: csv::Reader<R>,
    columns: Columns,
}

impl<R: io::Read> Rows<R> {
    /// Reads the header record and prepares to stream rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the header record cannot be read.
    pub fn new(reader: R, config: &Config) -> Result<Self, LoadError> {
        // `Config` only holds ASCII delimiters
        let delimiter = u8::try_from(config.delimiter()).unwrap_or(b',');
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);
        let columns = Columns::from_headers(reader.headers()?);
        debug!(columns = columns.0.len(), "read header record");

        Ok(Self { reader, columns })
    }
}

impl<R: io::Read> Iterator for Rows<R> {
    type Item = Result<RawRow, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Err(error) => Some(Err(error.into())),
            Ok(true) => Some(self.columns.row(&record).map_err(|source| {
                LoadError::MalformedRow {
                    line: record.position().map_or(0, csv::Position::line),
                    source,
                }
            })),
        }
    }
}

/// Reads and assembles a standard from CSV.
///
/// # Errors
///
/// Returns the first error encountered: invalid CSV, a row lacking a column,
/// or a row that cannot be assembled.
pub fn read<R: io::Read>(reader: R, config: &Config) -> Result<Standard, LoadError> {
    let mut assembler = Assembler::new(config);
    for row in Rows::new(reader, config)? {
        let row = row?;
        assembler
            .push(&row)
            .map_err(|source| LoadError::Build {
                requirement: row.req_id.clone(),
                source,
            })?;
    }
    Ok(assembler.finish())
}

/// Loads a standard from a CSV file.
///
/// The file is closed before this function returns, whether or not loading
/// succeeds.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, or for any error listed on
/// [`read`].
#[instrument(skip(config))]
pub fn load(path: &Path, config: &Config) -> Result<Standard, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let standard = read(file, config)?;
    debug!(
        chapters = standard.chapters().len(),
        requirements = standard.len(),
        "loaded standard"
    );
    Ok(standard)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::{Level, identifier};

    const SAMPLE: &str = "\
chapter_id,chapter_name,section_id,section_name,req_id,req_description,level1,level2,level3,cwe,nist
V1,Architecture,V1.1,Secure Software Development Lifecycle,V1.1.1,\"Verify the use of a secure software development lifecycle that addresses security in all stages of development. ([C1](https://owasp.org/www-project-proactive-controls/#div-numbering))\",,✓,✓,,
V1,Architecture,V1.1,Secure Software Development Lifecycle,V1.1.2,\"Verify the use of threat modeling for every design change or sprint planning to identify threats, plan for countermeasures, facilitate appropriate risk responses, and guide security testing.\",,✓,✓,1053,
V1,Architecture,V1.2,Authentication Architecture,V1.2.1,\"Verify the use of unique or special low-privilege operating system accounts for all application components, services, and servers. ([C3](https://owasp.org/www-project-proactive-controls/#div-numbering))\",,✓,✓,250,
V2,Authentication,V2.1,Password Security,V2.1.1,\"Verify that user set passwords are at least 12 characters in length (after multiple spaces are combined). ([C6](https://owasp.org/www-project-proactive-controls/#div-numbering))\",✓,✓,✓,521,5.1.1.2
V2,Authentication,V2.1,Password Security,V2.1.2,\"Verify that passwords of at least 64 characters are permitted, and that passwords of more than 128 characters are denied. ([C6](https://owasp.org/www-project-proactive-controls/#div-numbering))\",✓,✓,✓,521,5.1.1.2
V2,Authentication,V2.2,General Authenticator Security,V2.2.1,\"Verify that anti-automation controls are effective at mitigating breached credential testing, brute force, and account lockout attacks.\",✓,✓,✓,307,5.2.2 / 5.1.1.2 / 5.1.4.2 / 5.1.5.2
";

    const HEADER: &str = "chapter_id,chapter_name,section_id,section_name,req_id,req_description,level1,level2,level3,cwe,nist\n";

    fn read_str(input: &str) -> Result<Standard, LoadError> {
        read(input.as_bytes(), &Config::default())
    }

    #[test]
    fn reads_sample() {
        let standard = read_str(SAMPLE).unwrap();

        assert_eq!(standard.len(), 6);
        assert_eq!(standard.chapters().len(), 2);
        assert_eq!(standard.sections().count(), 4);

        let sections: Vec<_> = standard
            .sections()
            .map(|view| (view.unique_id(), view.section.name().to_string()))
            .collect();
        assert_eq!(
            sections,
            [
                ("V1.1", "Secure Software Development Lifecycle"),
                ("V1.2", "Authentication Architecture"),
                ("V2.1", "Password Security"),
                ("V2.2", "General Authenticator Security"),
            ]
            .map(|(id, name)| (id.to_string(), name.to_string()))
        );
    }

    #[test]
    fn reads_sample_with_byte_order_mark() {
        let input = format!("\u{feff}{SAMPLE}");
        let standard = read_str(&input).unwrap();

        assert_eq!(standard, read_str(SAMPLE).unwrap());
        assert_eq!(standard.chapters()[0].unique_id(), "V1");
    }

    #[test]
    fn header_names_ignore_byte_order_mark_and_padding() {
        let headers = StringRecord::from(vec!["\u{feff}chapter_id", " req_id ", "notes"]);
        let columns = Columns::from_headers(&headers);

        assert_eq!(columns.0.get(&Field::ChapterId), Some(&0));
        assert_eq!(columns.0.get(&Field::RequirementId), Some(&1));
        assert_eq!(columns.0.len(), 2);
    }

    #[test]
    fn decodes_requirement_columns() {
        let standard = read_str(SAMPLE).unwrap();
        let view = standard
            .requirements()
            .find(|view| view.unique_id() == "V2.1.1")
            .unwrap();
        let requirement = view.requirement;

        assert_eq!(
            requirement.description(),
            "Verify that user set passwords are at least 12 characters in length (after multiple spaces are combined)."
        );
        assert_eq!(
            requirement.link(),
            Some("https://owasp.org/www-project-proactive-controls/#div-numbering")
        );
        assert_eq!(
            requirement.levels().iter().collect::<Vec<_>>(),
            Level::ALL
        );
        assert_eq!(requirement.cwe(), Some("521"));
        assert_eq!(requirement.nist(), Some("5.1.1.2"));
        assert_eq!(view.chapter.name(), "Authentication");
    }

    #[test]
    fn requirement_without_link_keeps_text() {
        let standard = read_str(SAMPLE).unwrap();
        let requirement = standard.requirements().nth(1).unwrap().requirement;

        assert!(requirement.description().starts_with("Verify the use of threat modeling"));
        assert!(requirement.description().ends_with("guide security testing."));
        assert_eq!(requirement.link(), None);
        assert!(!requirement.levels().contains(Level::L1));
    }

    #[test]
    fn header_only_is_empty() {
        let standard = read_str(HEADER).unwrap();
        assert!(standard.is_empty());
        assert!(standard.chapters().is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(read_str("").unwrap().is_empty());
    }

    #[test]
    fn column_order_does_not_matter() {
        let input = "\
req_id,req_description,level3,level2,level1,section_name,section_id,chapter_name,chapter_id,nist,cwe
V3.1.1,Verify sessions.,✓,,,Fundamental Session Management Security,V3.1,Session Management,V3,,
";
        let standard = read_str(input).unwrap();
        let view = standard.requirements().next().unwrap();
        assert_eq!(view.unique_id(), "V3.1.1");
        assert_eq!(
            view.requirement.levels().iter().collect::<Vec<_>>(),
            [Level::L3]
        );
        assert_eq!(view.chapter.name(), "Session Management");
    }

    #[test]
    fn missing_header_is_malformed_row() {
        let input = "\
chapter_id,chapter_name,section_id,section_name,req_id,req_description,level1,level2,cwe,nist
V1,Architecture,V1.1,SDLC,V1.1.1,text,✓,✓,,
";
        let error = read_str(input).unwrap_err();
        assert!(matches!(
            error,
            LoadError::MalformedRow {
                line: 2,
                source: MissingFieldError(Field::Level3),
            }
        ));
    }

    #[test]
    fn short_record_is_malformed_row() {
        let input = format!("{HEADER}V1,Architecture,V1.1,SDLC,V1.1.1,text,✓\n");
        let error = read_str(&input).unwrap_err();
        assert!(matches!(
            error,
            LoadError::MalformedRow {
                source: MissingFieldError(Field::Level2),
                ..
            }
        ));
    }

    #[test]
    fn malformed_identifier_names_requirement() {
        let input = format!("{HEADER}V1,Architecture,V1.1,SDLC,V1.1,text,✓,,,,\n");
        let error = read_str(&input).unwrap_err();

        match error {
            LoadError::Build {
                requirement,
                source: BuildError::MalformedIdentifier(identifier::Error::Syntax(..)),
            } => assert_eq!(requirement, "V1.1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reading_twice_is_idempotent() {
        assert_eq!(read_str(SAMPLE).unwrap(), read_str(SAMPLE).unwrap());
    }

    #[test]
    fn custom_delimiter() {
        let mut config = Config::default();
        assert!(config.set_delimiter(';'));
        let input = SAMPLE.lines().take(1).collect::<String>().replace(',', ";")
            + "\nV1;Architecture;V1.1;SDLC;V1.1.1;text;;✓;;;\n";

        let standard = read(input.as_bytes(), &config).unwrap();
        assert_eq!(standard.requirements().next().unwrap().unique_id(), "V1.1.1");
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let standard = load(file.path(), &Config::default()).unwrap();
        assert_eq!(standard, read_str(SAMPLE).unwrap());
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.csv");

        let error = load(&missing, &Config::default()).unwrap_err();
        assert!(matches!(error, LoadError::Open { .. }));
        assert!(error.to_string().starts_with("failed to open"));
    }
}
