//! Projects: owned records with a tag-described need and a team of members.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::profile::ProfileId;
use super::tags::TagList;
use super::validation::FieldViolation;

/// Maximum project title length in characters.
pub const TITLE_MAX: usize = 100;

/// Validation errors for project fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectValidationError {
    /// Title was blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Permitted maximum.
        max: usize,
    },
    /// Description was blank.
    #[error("description must not be empty")]
    EmptyDescription,
}

impl From<ProjectValidationError> for FieldViolation {
    fn from(value: ProjectValidationError) -> Self {
        let (field, code) = match &value {
            ProjectValidationError::EmptyTitle => ("title", "empty_title"),
            ProjectValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
            ProjectValidationError::EmptyDescription => ("description", "empty_description"),
        };
        Self::new(field, code, value.to_string())
    }
}

/// Stable identifier of a project.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    /// Wrap a raw database identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed, non-empty title of at most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(into = "String")]
#[schema(value_type = String, example = "DevMatch Platform")]
pub struct ProjectTitle(String);

impl ProjectTitle {
    /// Trim and validate a title.
    ///
    /// # Errors
    /// [`ProjectValidationError`] when the title is blank or too long.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProjectValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(ProjectValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProjectTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ProjectTitle> for String {
    fn from(value: ProjectTitle) -> Self {
        value.0
    }
}

/// Non-blank free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(into = "String")]
#[schema(value_type = String)]
pub struct ProjectDescription(String);

impl ProjectDescription {
    /// Accept any description with visible text, kept as written.
    ///
    /// # Errors
    /// [`ProjectValidationError::EmptyDescription`] for blank text.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProjectValidationError> {
        let text = raw.into();
        if text.trim().is_empty() {
            return Err(ProjectValidationError::EmptyDescription);
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for ProjectDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ProjectDescription> for String {
    fn from(value: ProjectDescription) -> Self {
        value.0
    }
}

/// Validated, unsaved project content.
///
/// # Examples
/// ```
/// use devmatch::domain::{ProjectDraft, TagList};
///
/// let draft = ProjectDraft::try_new(
///     "  DevMatch ",
///     "Match developers with projects",
///     TagList::parse("Go, Rust, Rust"),
///     TagList::parse(""),
/// )
/// .unwrap();
/// assert_eq!(draft.title.as_ref(), "DevMatch");
/// assert_eq!(draft.tech_stack.as_slice(), ["Go", "Rust", "Rust"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Project name.
    pub title: ProjectTitle,
    /// What the project is about.
    pub description: ProjectDescription,
    /// Technologies in use.
    pub tech_stack: TagList,
    /// Roles the team is looking for.
    pub needed_roles: TagList,
}

impl ProjectDraft {
    /// Validate raw project content.
    ///
    /// # Errors
    /// [`ProjectValidationError`] for the first invalid field.
    pub fn try_new(
        title: impl AsRef<str>,
        description: impl Into<String>,
        tech_stack: TagList,
        needed_roles: TagList,
    ) -> Result<Self, ProjectValidationError> {
        Ok(Self {
            title: ProjectTitle::new(title)?,
            description: ProjectDescription::new(description)?,
            tech_stack,
            needed_roles,
        })
    }
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    /// Replacement title.
    pub title: Option<ProjectTitle>,
    /// Replacement description.
    pub description: Option<ProjectDescription>,
    /// Replacement tech stack.
    pub tech_stack: Option<TagList>,
    /// Replacement needed roles.
    pub needed_roles: Option<TagList>,
}

impl From<ProjectDraft> for ProjectChanges {
    fn from(value: ProjectDraft) -> Self {
        Self {
            title: Some(value.title),
            description: Some(value.description),
            tech_stack: Some(value.tech_stack),
            needed_roles: Some(value.needed_roles),
        }
    }
}

/// Persisted project.
///
/// ## Invariants
/// - `created_by` never changes after creation.
/// - `members` is a set; the owner is only a member when explicitly added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Project {
    /// Database identifier.
    pub id: ProjectId,
    /// Project name.
    pub title: ProjectTitle,
    /// What the project is about.
    pub description: ProjectDescription,
    /// Technologies in use.
    pub tech_stack: TagList,
    /// Roles the team is looking for.
    pub needed_roles: TagList,
    /// Owning profile.
    pub created_by: ProfileId,
    /// Profiles that have joined.
    #[schema(value_type = Vec<i64>)]
    pub members: BTreeSet<ProfileId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether `profile` is in the member set.
    #[must_use]
    pub fn is_member(&self, profile: ProfileId) -> bool {
        self.members.contains(&profile)
    }

    /// Whether `profile` owns the project.
    #[must_use]
    pub fn is_owner(&self, profile: ProfileId) -> bool {
        self.created_by == profile
    }

    /// Whether `profile` owns or has joined the project.
    #[must_use]
    pub fn involves(&self, profile: ProfileId) -> bool {
        self.is_owner(profile) || self.is_member(profile)
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, changes: ProjectChanges) {
        let ProjectChanges {
            title,
            description,
            tech_stack,
            needed_roles,
        } = changes;
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = tech_stack {
            self.tech_stack = value;
        }
        if let Some(value) = needed_roles {
            self.needed_roles = value;
        }
    }
}

/// Project awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Validated content.
    pub draft: ProjectDraft,
    /// Owning profile.
    pub created_by: ProfileId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn project() -> Project {
        Project {
            id: ProjectId::new(1),
            title: ProjectTitle::new("DevMatch").expect("title"),
            description: ProjectDescription::new("Matching").expect("description"),
            tech_stack: TagList::parse("Rust"),
            needed_roles: TagList::parse("Designer"),
            created_by: ProfileId::new(10),
            members: BTreeSet::from([ProfileId::new(12), ProfileId::new(11)]),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("date"),
        }
    }

    #[rstest]
    #[case("", ProjectValidationError::EmptyTitle)]
    #[case("   ", ProjectValidationError::EmptyTitle)]
    fn rejects_blank_titles(#[case] raw: &str, #[case] expected: ProjectValidationError) {
        assert_eq!(ProjectTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn title_length_is_counted_after_trimming() {
        let exact = format!("  {}  ", "t".repeat(TITLE_MAX));
        assert!(ProjectTitle::new(&exact).is_ok());
        assert_eq!(
            ProjectTitle::new("t".repeat(TITLE_MAX + 1)),
            Err(ProjectValidationError::TitleTooLong { max: TITLE_MAX })
        );
    }

    #[rstest]
    fn rejects_blank_description() {
        assert_eq!(
            ProjectDescription::new(" \n"),
            Err(ProjectValidationError::EmptyDescription)
        );
    }

    #[rstest]
    fn owner_is_not_implicitly_a_member(project: Project) {
        assert!(project.is_owner(ProfileId::new(10)));
        assert!(!project.is_member(ProfileId::new(10)));
        assert!(project.involves(ProfileId::new(10)));
        assert!(project.involves(ProfileId::new(11)));
        assert!(!project.involves(ProfileId::new(99)));
    }

    #[rstest]
    fn partial_changes_keep_unspecified_fields(mut project: Project) {
        project.apply(ProjectChanges {
            tech_stack: Some(TagList::parse("Go, Rust")),
            ..ProjectChanges::default()
        });
        assert_eq!(project.title.as_ref(), "DevMatch");
        assert_eq!(project.tech_stack.as_slice(), ["Go", "Rust"]);
    }

    #[rstest]
    fn members_serialise_in_ascending_order(project: Project) {
        let value = serde_json::to_value(&project).expect("serialise project");
        assert_eq!(value["members"], json!([11, 12]));
        assert_eq!(value["created_by"], json!(10));
        assert_eq!(value["title"], json!("DevMatch"));
    }
}
