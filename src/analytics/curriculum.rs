//! Shared enumerations for subject codes and year levels.
//!
//! Course subjects and university goal subjects are both validated against
//! [`SubjectCode`] before they are written, so pathway matching compares codes
//! drawn from the same list.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CurriculumError {
    #[error("unknown subject code: {0}")]
    UnknownSubjectCode(String),
    #[error("unknown year level: {0}")]
    UnknownYearLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectCode {
    MathematicsStandard,
    MathematicsAdvanced,
    MathematicsExtension1,
    MathematicsExtension2,
    EnglishStandard,
    EnglishAdvanced,
    EnglishExtension1,
    EnglishExtension2,
    Physics,
    Chemistry,
    Biology,
    Economics,
    BusinessStudies,
    ModernHistory,
    AncientHistory,
    Geography,
    VisualArts,
    InformationProcessesTechnology,
    SoftwareDesignDevelopment,
}

impl SubjectCode {
    pub const ALL: [SubjectCode; 19] = [
        Self::MathematicsStandard,
        Self::MathematicsAdvanced,
        Self::MathematicsExtension1,
        Self::MathematicsExtension2,
        Self::EnglishStandard,
        Self::EnglishAdvanced,
        Self::EnglishExtension1,
        Self::EnglishExtension2,
        Self::Physics,
        Self::Chemistry,
        Self::Biology,
        Self::Economics,
        Self::BusinessStudies,
        Self::ModernHistory,
        Self::AncientHistory,
        Self::Geography,
        Self::VisualArts,
        Self::InformationProcessesTechnology,
        Self::SoftwareDesignDevelopment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MathematicsStandard => "MATHEMATICS_STANDARD",
            Self::MathematicsAdvanced => "MATHEMATICS_ADVANCED",
            Self::MathematicsExtension1 => "MATHEMATICS_EXTENSION_1",
            Self::MathematicsExtension2 => "MATHEMATICS_EXTENSION_2",
            Self::EnglishStandard => "ENGLISH_STANDARD",
            Self::EnglishAdvanced => "ENGLISH_ADVANCED",
            Self::EnglishExtension1 => "ENGLISH_EXTENSION_1",
            Self::EnglishExtension2 => "ENGLISH_EXTENSION_2",
            Self::Physics => "PHYSICS",
            Self::Chemistry => "CHEMISTRY",
            Self::Biology => "BIOLOGY",
            Self::Economics => "ECONOMICS",
            Self::BusinessStudies => "BUSINESS_STUDIES",
            Self::ModernHistory => "MODERN_HISTORY",
            Self::AncientHistory => "ANCIENT_HISTORY",
            Self::Geography => "GEOGRAPHY",
            Self::VisualArts => "VISUAL_ARTS",
            Self::InformationProcessesTechnology => "INFORMATION_PROCESSES_TECHNOLOGY",
            Self::SoftwareDesignDevelopment => "SOFTWARE_DESIGN_DEVELOPMENT",
        }
    }

    /// `MATHEMATICS_EXTENSION_1` -> `MATHEMATICS EXTENSION 1`
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Extension courses are 2 units, everything else 4.
    pub fn units(&self) -> i32 {
        match self {
            Self::MathematicsExtension1
            | Self::MathematicsExtension2
            | Self::EnglishExtension1
            | Self::EnglishExtension2 => 2,
            _ => 4,
        }
    }
}

impl FromStr for SubjectCode {
    type Err = CurriculumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|code| code.as_str() == s)
            .copied()
            .ok_or_else(|| CurriculumError::UnknownSubjectCode(s.to_string()))
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YearLevel {
    #[default]
    Year11,
    Year12,
}

impl YearLevel {
    pub const ALL: [YearLevel; 2] = [Self::Year11, Self::Year12];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year11 => "YEAR_11",
            Self::Year12 => "YEAR_12",
        }
    }

    /// `YEAR_12` -> `YEAR 12`
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Year11 => "YEAR 11",
            Self::Year12 => "YEAR 12",
        }
    }
}

impl FromStr for YearLevel {
    type Err = CurriculumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YEAR_11" => Ok(Self::Year11),
            "YEAR_12" => Ok(Self::Year12),
            other => Err(CurriculumError::UnknownYearLevel(other.to_string())),
        }
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
