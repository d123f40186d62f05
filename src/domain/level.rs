use std::{collections::BTreeSet, fmt, str::FromStr};

/// One of the three increasing rigour levels of the standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Level 1: the minimum for all applications.
    L1,
    /// Level 2: applications containing sensitive data.
    L2,
    /// Level 3: the most critical applications.
    L3,
}

impl Level {
    /// All levels, in marker-column order.
    pub const ALL: [Self; 3] = [Self::L1, Self::L2, Self::L3];

    /// The level as a number (1, 2 or 3).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L3 => 3,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "L{}", self.number())
    }
}

/// Error returned when a level cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid level '{0}': expected 1, 2 or 3")]
pub struct InvalidLevelError(String);

impl FromStr for Level {
    type Err = InvalidLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(['L', 'l']).unwrap_or(s) {
            "1" => Ok(Self::L1),
            "2" => Ok(Self::L2),
            "3" => Ok(Self::L3),
            _ => Err(InvalidLevelError(s.to_string())),
        }
    }
}

/// The set of levels a requirement applies to.
///
/// Each level is decided by its own marker column; nothing is inferred
/// between levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Levels(BTreeSet<Level>);

impl Levels {
    /// Decodes the three marker columns, in level order.
    ///
    /// A column marks its level when its trimmed value equals `marker`.
    #[must_use]
    pub fn from_markers(markers: [&str; 3], marker: &str) -> Self {
        Level::ALL
            .into_iter()
            .zip(markers)
            .filter(|(_, value)| value.trim() == marker)
            .map(|(level, _)| level)
            .collect()
    }

    /// Whether the set contains `level`.
    #[must_use]
    pub fn contains(&self, level: Level) -> bool {
        self.0.contains(&level)
    }

    /// Whether no level is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the levels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Level> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Level> for Levels {
    fn from_iter<T: IntoIterator<Item = Level>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Levels {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let levels: Vec<_> = self.iter().map(|level| level.to_string()).collect();
        write!(f, "{}", levels.join(","))
    }
}
