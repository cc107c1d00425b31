//! Developer profiles: the one-to-one extension of an identity that owns and
//! joins projects.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::IdentityId;
use super::tags::TagList;
use super::validation::FieldViolation;

/// Maximum length of a single skill, interest or role entry.
pub const PROFILE_TAG_MAX: usize = 50;

/// Availability assumed when a profile does not state one.
pub const DEFAULT_AVAILABILITY_HOURS: i32 = 10;

/// Validation errors for profile fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// A tag in one of the lists exceeded [`PROFILE_TAG_MAX`] characters.
    #[error("{field} entries must be at most {max} characters")]
    TagTooLong {
        /// Name of the offending list.
        field: &'static str,
        /// Permitted maximum per entry.
        max: usize,
    },
    /// Availability was negative.
    #[error("availability_hours must not be negative")]
    NegativeAvailability,
}

impl From<ProfileValidationError> for FieldViolation {
    fn from(value: ProfileValidationError) -> Self {
        let (field, code) = match &value {
            ProfileValidationError::TagTooLong { field, .. } => (*field, "tag_too_long"),
            ProfileValidationError::NegativeAvailability => {
                ("availability_hours", "negative_availability")
            }
        };
        Self::new(field, code, value.to_string())
    }
}

/// Stable identifier of a profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ProfileId(i64);

impl ProfileId {
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

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editable profile content.
///
/// ## Invariants
/// - Every skill, interest and role is at most [`PROFILE_TAG_MAX`] characters.
/// - `availability_hours` is non-negative.
///
/// # Examples
/// ```
/// use devmatch::domain::{ProfileDetails, TagList};
///
/// let details = ProfileDetails::try_new(
///     "Backend developer",
///     TagList::parse("Rust, SQL"),
///     TagList::default(),
///     None,
///     TagList::parse("Backend"),
/// )
/// .unwrap();
/// assert_eq!(details.availability_hours(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProfileDetails {
    bio: String,
    skills: TagList,
    interests: TagList,
    availability_hours: i32,
    preferred_roles: TagList,
}

impl Default for ProfileDetails {
    fn default() -> Self {
        Self {
            bio: String::new(),
            skills: TagList::default(),
            interests: TagList::default(),
            availability_hours: DEFAULT_AVAILABILITY_HOURS,
            preferred_roles: TagList::default(),
        }
    }
}

impl ProfileDetails {
    /// Validate profile content; a missing availability uses the default.
    ///
    /// # Errors
    /// [`ProfileValidationError`] for an overlong tag or negative hours.
    pub fn try_new(
        bio: impl Into<String>,
        skills: TagList,
        interests: TagList,
        availability_hours: Option<i32>,
        preferred_roles: TagList,
    ) -> Result<Self, ProfileValidationError> {
        check_tag_lengths("skills", &skills)?;
        check_tag_lengths("interests", &interests)?;
        check_tag_lengths("preferred_roles", &preferred_roles)?;
        let hours = availability_hours.unwrap_or(DEFAULT_AVAILABILITY_HOURS);
        if hours < 0 {
            return Err(ProfileValidationError::NegativeAvailability);
        }
        Ok(Self {
            bio: bio.into().trim().to_owned(),
            skills,
            interests,
            availability_hours: hours,
            preferred_roles,
        })
    }

    /// Free-text introduction, trimmed.
    #[must_use]
    pub fn bio(&self) -> &str {
        self.bio.as_str()
    }

    /// Technologies the developer knows.
    #[must_use]
    pub const fn skills(&self) -> &TagList {
        &self.skills
    }

    /// Areas the developer wants to work in.
    #[must_use]
    pub const fn interests(&self) -> &TagList {
        &self.interests
    }

    /// Hours per week the developer can offer.
    #[must_use]
    pub const fn availability_hours(&self) -> i32 {
        self.availability_hours
    }

    /// Roles the developer would take on a team.
    #[must_use]
    pub const fn preferred_roles(&self) -> &TagList {
        &self.preferred_roles
    }
}

fn check_tag_lengths(field: &'static str, tags: &TagList) -> Result<(), ProfileValidationError> {
    if tags.iter().any(|tag| tag.chars().count() > PROFILE_TAG_MAX) {
        return Err(ProfileValidationError::TagTooLong {
            field,
            max: PROFILE_TAG_MAX,
        });
    }
    Ok(())
}

/// Persisted profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Profile {
    /// Database identifier.
    pub id: ProfileId,
    /// Owning identity.
    #[serde(skip)]
    pub identity_id: IdentityId,
    /// Editable content.
    #[serde(flatten)]
    pub details: ProfileDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Profile awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    /// Owning identity.
    pub identity_id: IdentityId,
    /// Initial content.
    pub details: ProfileDetails,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn defaults_match_a_fresh_profile() {
        let details = ProfileDetails::default();
        assert_eq!(details.bio(), "");
        assert!(details.skills().is_empty());
        assert_eq!(details.availability_hours(), DEFAULT_AVAILABILITY_HOURS);
    }

    #[rstest]
    #[case("skills")]
    #[case("interests")]
    #[case("preferred_roles")]
    fn rejects_overlong_tags(#[case] field: &'static str) {
        let long = TagList::from_items([&"x".repeat(PROFILE_TAG_MAX + 1)]);
        let (skills, interests, roles) = match field {
            "skills" => (long, TagList::default(), TagList::default()),
            "interests" => (TagList::default(), long, TagList::default()),
            _ => (TagList::default(), TagList::default(), long),
        };
        let err = ProfileDetails::try_new("", skills, interests, None, roles)
            .expect_err("tag too long");
        assert_eq!(
            err,
            ProfileValidationError::TagTooLong {
                field,
                max: PROFILE_TAG_MAX
            }
        );
    }

    #[rstest]
    fn rejects_negative_availability() {
        let err = ProfileDetails::try_new(
            "",
            TagList::default(),
            TagList::default(),
            Some(-1),
            TagList::default(),
        )
        .expect_err("negative hours");
        assert_eq!(err, ProfileValidationError::NegativeAvailability);
    }

    #[rstest]
    fn serialises_flat_snake_case_fields() {
        let profile = Profile {
            id: ProfileId::new(7),
            identity_id: IdentityId::new(3),
            details: ProfileDetails::try_new(
                "Rustacean",
                TagList::parse("Rust"),
                TagList::parse("CLI"),
                Some(12),
                TagList::parse("Backend"),
            )
            .expect("valid details"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date"),
        };
        let value = serde_json::to_value(&profile).expect("serialise profile");
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["availability_hours"], json!(12));
        assert_eq!(value["preferred_roles"], json!(["Backend"]));
        assert!(value.get("identity_id").is_none());
    }
}
