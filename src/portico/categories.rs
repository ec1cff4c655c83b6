//! Controlled subcategory vocabulary per main category.
//!
//! The store does not enforce the pairing; UIs validate against this table
//! before submitting a draft.

use crate::model::{MainCategory, SubCategories};

const ARCHITECTURAL: &[&str] = &[
    "Agricultural Buildings",
    "Commercial Architecture",
    "Conceptual Architecture",
    "Cultural Architecture",
    "Educational Buildings",
    "Green architecture",
    "Healthcare / Wellness",
    "Heritage Architecture",
    "High Rise Buildings",
    "Hospitality Architecture",
    "Industrial Buildings",
    "Infrastructure",
    "Institutional Architecture",
    "Misc. Architecture",
    "Mixed Use Architecture",
    "Other Architecture",
    "Recreational Architecture",
    "Residential Architecture - Multi Unit",
    "Residential Architecture - Single Family",
    "Restoration & Renovation",
    "Small Architecture",
    "Social Housing",
    "Transportation",
    "Virtual Architecture",
];

const INTERIOR: &[&str] = &[
    "Apartments Interior",
    "Commercial Interior",
    "Conceptual Interior",
    "Exhibition",
    "Hospitality Interior",
    "Houses Interior",
    "Other Interior Design",
    "Public Spaces",
    "Residential Interior",
    "Retail Interior",
    "Rooms and Zones",
    "Workplaces Interior",
];

const LANDSCAPE: &[&str] = &[
    "Commercial Landscape",
    "Conceptual Landscape",
    "Educational Landscape",
    "Gardens",
    "Installations & structures",
    "Large Scale Landscape Projects",
    "Other Landscape Architecture",
    "Outdoor Designs",
    "Public Landscape",
    "Residential Landscape",
    "Small Scale Landscape Projects",
    "Urban Design",
    "Urban Planning",
];

pub fn subcategories(main: MainCategory) -> &'static [&'static str] {
    match main {
        MainCategory::ArchitecturalDesign => ARCHITECTURAL,
        MainCategory::InteriorDesign => INTERIOR,
        MainCategory::LandscapeArchitecture => LANDSCAPE,
    }
}

/// Returns the entries of `subs` that are not in `main`'s vocabulary.
pub fn validate_pairing(main: MainCategory, subs: &SubCategories) -> Vec<String> {
    let allowed = subcategories(main);
    subs.iter()
        .filter(|s| !allowed.contains(&s.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_sizes() {
        assert_eq!(subcategories(MainCategory::ArchitecturalDesign).len(), 24);
        assert_eq!(subcategories(MainCategory::InteriorDesign).len(), 12);
        assert_eq!(subcategories(MainCategory::LandscapeArchitecture).len(), 13);
    }

    #[test]
    fn pairing_reports_foreign_subcategories() {
        let subs = SubCategories::new(["Gardens", "Exhibition"]);
        assert_eq!(
            validate_pairing(MainCategory::LandscapeArchitecture, &subs),
            vec!["Exhibition".to_string()]
        );
        assert!(validate_pairing(
            MainCategory::InteriorDesign,
            &SubCategories::new(["Exhibition"])
        )
        .is_empty());
    }
}
