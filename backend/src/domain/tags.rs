//! Tag lists: ordered labels such as skills or a tech stack.
//!
//! Tags arrive either as comma-separated free text (forms) or as JSON lists
//! (API). Both paths trim each entry and discard blanks; duplicates and order
//! are preserved.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Separator used when rendering a tag list back into editable text.
pub const TAG_SEPARATOR: &str = ", ";

/// Split comma-separated text into trimmed, non-empty tags.
///
/// # Examples
/// ```
/// use devmatch::domain::parse_tags;
///
/// assert_eq!(parse_tags("Django, React, "), vec!["Django", "React"]);
/// assert!(parse_tags("").is_empty());
/// ```
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join tags with [`TAG_SEPARATOR`] for editing.
///
/// # Examples
/// ```
/// use devmatch::domain::{parse_tags, serialize_tags};
///
/// let tags = parse_tags("Go,Rust ,  Rust");
/// assert_eq!(serialize_tags(&tags), "Go, Rust, Rust");
/// ```
#[must_use]
pub fn serialize_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Ordered list of normalised tags.
///
/// ## Invariants
/// - Every entry is trimmed and non-empty.
/// - Order and duplicates from the input are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
#[schema(value_type = Vec<String>, example = json!(["Rust", "PostgreSQL"]))]
pub struct TagList(Vec<String>);

impl TagList {
    /// Parse comma-separated text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(parse_tags(raw))
    }

    /// Normalise an already-split list of entries.
    #[must_use]
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .filter_map(|item| {
                    let trimmed = item.as_ref().trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_owned())
                })
                .collect(),
        )
    }

    /// Render as editable comma-separated text.
    #[must_use]
    pub fn to_raw(&self) -> String {
        serialize_tags(&self.0)
    }

    /// Borrow the entries.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the entries.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying entries.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for TagList {
    fn from(value: Vec<String>) -> Self {
        Self::from_items(value)
    }
}

impl From<TagList> for Vec<String> {
    fn from(value: TagList) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Tag input accepted by the JSON API: either a list or comma-separated text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TagInput {
    /// `["Go", "Rust"]`
    List(Vec<String>),
    /// `"Go, Rust"`
    Raw(String),
}

impl From<TagInput> for TagList {
    fn from(value: TagInput) -> Self {
        match value {
            TagInput::List(items) => Self::from_items(items),
            TagInput::Raw(raw) => Self::parse(&raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Django, React, ", &["Django", "React"])]
    #[case("", &[])]
    #[case(" , ,", &[])]
    #[case("Go, Rust, Rust", &["Go", "Rust", "Rust"])]
    #[case("  Machine Learning ,Web", &["Machine Learning", "Web"])]
    fn parse_trims_and_drops_blanks(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_tags(raw), expected);
    }

    #[rstest]
    #[case("Django, React")]
    #[case("Django,React")]
    #[case("  Django ,   React  ")]
    #[case("single")]
    fn round_trip_is_stable_modulo_whitespace(#[case] raw: &str) {
        let once = serialize_tags(&parse_tags(raw));
        assert_eq!(parse_tags(&once), parse_tags(raw));
        assert_eq!(serialize_tags(&parse_tags(&once)), once);
    }

    #[rstest]
    fn serialize_of_empty_list_is_empty_text() {
        assert_eq!(serialize_tags::<String>(&[]), "");
    }

    #[rstest]
    fn tag_input_accepts_list_or_text() {
        let list: TagInput = serde_json::from_str(r#"["Go", " ", "Rust "]"#).expect("list");
        let raw: TagInput = serde_json::from_str(r#""Go, Rust""#).expect("text");
        assert_eq!(TagList::from(list), TagList::parse("Go, Rust"));
        assert_eq!(TagList::from(raw).as_slice(), ["Go", "Rust"]);
    }

    #[rstest]
    fn deserialising_a_tag_list_normalises_entries() {
        let tags: TagList = serde_json::from_str(r#"[" Python ", ""]"#).expect("tags");
        assert_eq!(tags.as_slice(), ["Python"]);
    }
}
