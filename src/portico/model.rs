//! # Data Model
//!
//! [`Project`] is the only entity with identity. Rows arrive from the remote
//! store (or the local mirror) as camelCase JSON and are normalized on the way
//! in, so the rest of the crate never sees the legacy shapes:
//!
//! - `subCategory` may be a bare string in older rows; [`SubCategories`]
//!   always holds a list.
//! - `mainCategory` was stored both upper-case (`ARCHITECTURAL DESIGN`) and
//!   title-case; [`MainCategory`] parses either and writes title-case.
//! - Nullable text columns deserialize to empty strings.
//!
//! Writes use narrower shapes: [`ProjectDraft`] for creation, [`ProjectPatch`]
//! for metadata edits, and the crate-internal [`RowPatch`] which is the only
//! shape allowed to touch the `featured`/`archived` flags.

use crate::error::{PorticoError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ProjectId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MainCategory {
    ArchitecturalDesign,
    InteriorDesign,
    LandscapeArchitecture,
}

impl MainCategory {
    pub const ALL: [MainCategory; 3] = [
        MainCategory::ArchitecturalDesign,
        MainCategory::InteriorDesign,
        MainCategory::LandscapeArchitecture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MainCategory::ArchitecturalDesign => "Architectural Design",
            MainCategory::InteriorDesign => "Interior Design",
            MainCategory::LandscapeArchitecture => "Landscape Architecture",
        }
    }
}

impl fmt::Display for MainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MainCategory {
    type Err = PorticoError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        MainCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PorticoError::Validation(format!("Unknown main category: {}", s)))
    }
}

impl TryFrom<String> for MainCategory {
    type Error = PorticoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MainCategory> for String {
    fn from(value: MainCategory) -> Self {
        value.as_str().to_string()
    }
}

/// Ordered, de-duplicated list of subcategory names.
///
/// Accepts either a single string or a list on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubCategories(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum SubCategoryShape {
    One(String),
    Many(Vec<String>),
    Missing(Option<()>),
}

impl<'de> Deserialize<'de> for SubCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match SubCategoryShape::deserialize(deserializer)? {
            SubCategoryShape::One(single) => SubCategories::new([single]),
            SubCategoryShape::Many(list) => SubCategories::new(list),
            SubCategoryShape::Missing(_) => SubCategories::default(),
        })
    }
}

impl SubCategories {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            let item = item.into().trim().to_string();
            if !item.is_empty() && !out.contains(&item) {
                out.push(item);
            }
        }
        Self(out)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|s| s == name)
    }

    /// True when the two lists share at least one entry.
    pub fn overlaps(&self, other: &[String]) -> bool {
        other.iter().any(|s| self.contains(s))
    }
}

impl<S: Into<String>> FromIterator<S> for SubCategories {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SubCategories::new(iter)
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub main_category: MainCategory,
    #[serde(default)]
    pub sub_category: SubCategories,
    #[serde(default, deserialize_with = "nullable")]
    pub year: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub gallery_images: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable")]
    pub architect: String,
    #[serde(default, deserialize_with = "nullable")]
    pub area: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub client: String,
    #[serde(default, deserialize_with = "nullable")]
    pub featured: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub archived: bool,
}

impl Project {
    /// Featured and visible: the projects that count toward the featured floor.
    pub fn is_live_featured(&self) -> bool {
        self.featured && !self.archived
    }
}

/// Input for creating a project. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub title: String,
    pub category: Option<String>,
    pub main_category: Option<MainCategory>,
    pub sub_category: SubCategories,
    pub year: String,
    pub image_url: String,
    pub gallery_images: Option<Vec<String>>,
    pub description: String,
    pub location: String,
    pub architect: String,
    pub area: String,
    pub status: String,
    pub client: String,
    pub featured: bool,
}

impl ProjectDraft {
    pub fn new(
        title: impl Into<String>,
        main_category: MainCategory,
        sub_category: SubCategories,
    ) -> Self {
        Self {
            title: title.into(),
            main_category: Some(main_category),
            sub_category,
            ..Default::default()
        }
    }

    /// Checks the structurally required fields and produces the insert row.
    pub fn into_new_project(self) -> Result<NewProject> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(PorticoError::Validation("Title cannot be empty".into()));
        }
        let main_category = self
            .main_category
            .ok_or_else(|| PorticoError::Validation("Main category is required".into()))?;
        if self.sub_category.is_empty() {
            return Err(PorticoError::Validation(
                "At least one subcategory is required".into(),
            ));
        }

        Ok(NewProject {
            title,
            category: self.category,
            main_category,
            sub_category: self.sub_category,
            year: self.year,
            image_url: self.image_url,
            gallery_images: self.gallery_images.unwrap_or_default(),
            description: self.description,
            location: self.location,
            architect: self.architect,
            area: self.area,
            status: self.status,
            client: self.client,
            featured: self.featured,
            archived: false,
        })
    }
}

/// Insert shape sent to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub main_category: MainCategory,
    pub sub_category: SubCategories,
    pub year: String,
    pub image_url: String,
    pub gallery_images: Vec<String>,
    pub description: String,
    pub location: String,
    pub architect: String,
    pub area: String,
    pub status: String,
    pub client: String,
    pub featured: bool,
    pub archived: bool,
}

impl NewProject {
    pub fn with_id(self, id: ProjectId) -> Project {
        Project {
            id,
            title: self.title,
            category: self.category,
            main_category: self.main_category,
            sub_category: self.sub_category,
            year: self.year,
            image_url: self.image_url,
            gallery_images: self.gallery_images,
            description: self.description,
            location: self.location,
            architect: self.architect,
            area: self.area,
            status: self.status,
            client: self.client,
            featured: self.featured,
            archived: self.archived,
        }
    }
}

/// Partial metadata edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_category: Option<MainCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<SubCategories>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == ProjectPatch::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(PorticoError::Validation("Nothing to update".into()));
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(PorticoError::Validation("Title cannot be empty".into()));
            }
        }
        if let Some(subs) = &self.sub_category {
            if subs.is_empty() {
                return Err(PorticoError::Validation(
                    "At least one subcategory is required".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn apply(&self, project: &mut Project) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        if let Some(title) = &self.title {
            project.title = title.trim().to_string();
        }
        if self.category.is_some() {
            project.category = self.category.clone();
        }
        set(&mut project.main_category, &self.main_category);
        set(&mut project.sub_category, &self.sub_category);
        set(&mut project.year, &self.year);
        set(&mut project.image_url, &self.image_url);
        set(&mut project.gallery_images, &self.gallery_images);
        set(&mut project.description, &self.description);
        set(&mut project.location, &self.location);
        set(&mut project.architect, &self.architect);
        set(&mut project.area, &self.area);
        set(&mut project.status, &self.status);
        set(&mut project.client, &self.client);
    }
}

/// Update shape sent to the remote store. Only the repository builds these
/// with flag changes, so the featured floor is enforced in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPatch {
    #[serde(flatten)]
    pub fields: ProjectPatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl RowPatch {
    pub fn fields(fields: ProjectPatch) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn featured(featured: bool) -> Self {
        Self {
            featured: Some(featured),
            ..Default::default()
        }
    }

    pub fn archived(archived: bool) -> Self {
        Self {
            archived: Some(archived),
            ..Default::default()
        }
    }

    pub fn apply(&self, project: &mut Project) {
        self.fields.apply(project);
        if let Some(featured) = self.featured {
            project.featured = featured;
        }
        if let Some(archived) = self.archived {
            project.archived = archived;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// How the homepage picks its projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    Random,
    #[default]
    Featured,
}

impl DisplayMode {
    pub fn is_random(self) -> bool {
        self == DisplayMode::Random
    }

    pub fn from_random_flag(random: bool) -> Self {
        if random {
            DisplayMode::Random
        } else {
            DisplayMode::Featured
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Random => f.write_str("random"),
            DisplayMode::Featured => f.write_str("featured"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = PorticoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(DisplayMode::Random),
            "featured" | "curated" => Ok(DisplayMode::Featured),
            other => Err(PorticoError::Validation(format!(
                "Unknown display mode: {} (expected random or featured)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(sub_category: serde_json::Value, main: &str) -> serde_json::Value {
        json!({
            "id": 4,
            "title": "Azure Mosque",
            "mainCategory": main,
            "subCategory": sub_category,
            "year": "2023",
            "imageUrl": "/uploads/azure.png",
            "description": null,
            "location": "Dubai, UAE",
            "featured": true,
            "archived": false
        })
    }

    #[test]
    fn legacy_single_subcategory_becomes_list() {
        let p: Project =
            serde_json::from_value(row(json!("Cultural Architecture"), "Architectural Design"))
                .unwrap();
        assert_eq!(p.sub_category.as_slice(), ["Cultural Architecture"]);
        assert_eq!(p.description, "");
        assert!(p.gallery_images.is_empty());
    }

    #[test]
    fn list_subcategories_are_deduplicated() {
        let p: Project = serde_json::from_value(row(
            json!(["Gardens", " Gardens ", "Urban Design", ""]),
            "Landscape Architecture",
        ))
        .unwrap();
        assert_eq!(p.sub_category.as_slice(), ["Gardens", "Urban Design"]);
    }

    #[test]
    fn main_category_parses_upper_case_rows() {
        let p: Project =
            serde_json::from_value(row(json!(["Exhibition"]), "INTERIOR DESIGN")).unwrap();
        assert_eq!(p.main_category, MainCategory::InteriorDesign);

        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["mainCategory"], "Interior Design");
        assert_eq!(out["subCategory"], json!(["Exhibition"]));
    }

    #[test]
    fn unknown_main_category_is_rejected() {
        let result: std::result::Result<Project, _> =
            serde_json::from_value(row(json!(["Gardens"]), "Sculpture"));
        assert!(result.is_err());
    }

    #[test]
    fn draft_requires_title_category_and_subcategory() {
        let missing_title = ProjectDraft::new(
            "  ",
            MainCategory::InteriorDesign,
            SubCategories::new(["Exhibition"]),
        );
        assert!(matches!(
            missing_title.into_new_project(),
            Err(PorticoError::Validation(_))
        ));

        let missing_main = ProjectDraft {
            title: "Loft".into(),
            sub_category: SubCategories::new(["Exhibition"]),
            ..Default::default()
        };
        assert!(matches!(
            missing_main.into_new_project(),
            Err(PorticoError::Validation(_))
        ));

        let missing_subs =
            ProjectDraft::new("Loft", MainCategory::InteriorDesign, SubCategories::default());
        assert!(matches!(
            missing_subs.into_new_project(),
            Err(PorticoError::Validation(_))
        ));
    }

    #[test]
    fn draft_defaults_gallery_and_clears_archived() {
        let row = ProjectDraft::new(
            " Loft ",
            MainCategory::InteriorDesign,
            SubCategories::new(["Apartments Interior"]),
        )
        .into_new_project()
        .unwrap();
        assert_eq!(row.title, "Loft");
        assert!(row.gallery_images.is_empty());
        assert!(!row.archived);
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = RowPatch {
            fields: ProjectPatch {
                title: Some("New".into()),
                ..Default::default()
            },
            featured: Some(false),
            archived: None,
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"title": "New", "featured": false}));
    }

    #[test]
    fn empty_patch_is_invalid() {
        assert!(ProjectPatch::default().validate().is_err());
        let blank_title = ProjectPatch {
            title: Some(" ".into()),
            ..Default::default()
        };
        assert!(blank_title.validate().is_err());
    }

    #[test]
    fn display_mode_parsing() {
        assert_eq!("Random".parse::<DisplayMode>().unwrap(), DisplayMode::Random);
        assert_eq!("curated".parse::<DisplayMode>().unwrap(), DisplayMode::Featured);
        assert!("shuffle".parse::<DisplayMode>().is_err());
    }
}
