//! Static university catalogue and per-discipline subject requirements.

use serde::Serialize;

use crate::analytics::SubjectCode;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UniversityOption {
    pub name: &'static str,
    pub min_atar: f64,
    pub disciplines: &'static [&'static str],
}

const BROAD: &[&str] = &["Medicine", "Engineering", "Commerce", "Arts", "Science"];
const NO_MEDICINE: &[&str] = &["Engineering", "Commerce", "Arts", "Science"];

pub const UNIVERSITIES: &[UniversityOption] = &[
    UniversityOption { name: "University of Sydney", min_atar: 95.0, disciplines: BROAD },
    UniversityOption { name: "University of Melbourne", min_atar: 90.0, disciplines: BROAD },
    UniversityOption {
        name: "Australian National University",
        min_atar: 85.0,
        disciplines: &["Engineering", "Commerce", "Arts", "Science", "Law"],
    },
    UniversityOption { name: "University of New South Wales", min_atar: 85.0, disciplines: BROAD },
    UniversityOption { name: "Monash University", min_atar: 80.0, disciplines: BROAD },
    UniversityOption { name: "University of Queensland", min_atar: 75.0, disciplines: BROAD },
    UniversityOption {
        name: "University of Western Australia",
        min_atar: 75.0,
        disciplines: NO_MEDICINE,
    },
    UniversityOption { name: "University of Adelaide", min_atar: 70.0, disciplines: NO_MEDICINE },
    UniversityOption {
        name: "Macquarie University",
        min_atar: 70.0,
        disciplines: &["Commerce", "Arts", "Science", "Psychology"],
    },
    UniversityOption {
        name: "University of Technology Sydney",
        min_atar: 75.0,
        disciplines: &["Engineering", "Commerce", "Design", "IT"],
    },
];

#[derive(Debug, Clone, Copy)]
pub struct DisciplineRequirements {
    pub prerequisite: &'static [SubjectCode],
    pub recommended: &'static [SubjectCode],
}

/// `None` for disciplines without listed requirements (e.g. Design).
pub fn discipline_requirements(discipline: &str) -> Option<DisciplineRequirements> {
    use SubjectCode::*;

    let requirements = match discipline {
        "Medicine" => DisciplineRequirements {
            prerequisite: &[Chemistry, Biology, EnglishAdvanced],
            recommended: &[MathematicsAdvanced, Physics],
        },
        "Engineering" => DisciplineRequirements {
            prerequisite: &[MathematicsExtension1, Physics, EnglishStandard],
            recommended: &[Chemistry, MathematicsExtension2],
        },
        "Commerce" => DisciplineRequirements {
            prerequisite: &[MathematicsStandard, EnglishStandard],
            recommended: &[MathematicsAdvanced, Economics, BusinessStudies],
        },
        "Science" => DisciplineRequirements {
            prerequisite: &[MathematicsStandard, EnglishStandard],
            recommended: &[Chemistry, Biology, Physics, MathematicsAdvanced],
        },
        "Arts" => DisciplineRequirements {
            prerequisite: &[EnglishStandard],
            recommended: &[EnglishAdvanced, ModernHistory, AncientHistory],
        },
        "Law" => DisciplineRequirements {
            prerequisite: &[EnglishAdvanced],
            recommended: &[ModernHistory, Economics, EnglishExtension1],
        },
        _ => return None,
    };

    Some(requirements)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_catalogue_contents() {
        assert_eq!(UNIVERSITIES.len(), 10);
        assert_eq!(UNIVERSITIES[0].name, "University of Sydney");
        assert_eq!(UNIVERSITIES[0].min_atar, 95.0);
    }

    #[test]
    fn test_every_listed_discipline_is_known_or_free() {
        let free = ["Psychology", "Design", "IT"];
        for university in UNIVERSITIES {
            for discipline in university.disciplines {
                assert!(
                    discipline_requirements(discipline).is_some() || free.contains(discipline),
                    "{discipline} at {}",
                    university.name
                );
            }
        }
    }

    #[test]
    fn test_engineering_requirements() {
        let req = discipline_requirements("Engineering").unwrap();
        assert_eq!(
            req.prerequisite,
            &[
                SubjectCode::MathematicsExtension1,
                SubjectCode::Physics,
                SubjectCode::EnglishStandard
            ]
        );
        assert!(discipline_requirements("Design").is_none());
    }
}
