//! The normalized member record.

use serde::Serialize;

use clubhouse_core::MemberId;

use crate::backend::MemberDocument;

/// Image shown for members without a photo of their own.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/150x150/aaaaaa/ffffff?text=CH";

/// The display-ready shape of one directory entry.
///
/// Produced from a raw [`MemberDocument`] by a pure conversion; mapping the
/// same document twice yields identical records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    /// Stable unique id, matching the backing document's id.
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    /// Always present; the placeholder stands in when the source has none.
    pub image_url: String,
    /// Class year or role; empty when the source has none.
    pub classification: String,
    /// Empty means "do not display".
    pub relationship_status: String,
    pub email: String,
    pub phone: String,
    /// Presence marks this member as an officer.
    pub officer_title: Option<String>,
    /// Opt-in: whether other members may see the email.
    pub show_email: bool,
    /// Opt-in: whether other members may see the phone number.
    pub show_phone: bool,
}

impl MemberRecord {
    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this member holds an office.
    #[must_use]
    pub fn is_officer(&self) -> bool {
        self.officer_title.is_some()
    }

    /// Case-insensitive substring match against first OR last name.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_name(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
    }
}

impl From<MemberDocument> for MemberRecord {
    fn from(doc: MemberDocument) -> Self {
        Self {
            id: MemberId::new(doc.id),
            first_name: doc.first_name,
            last_name: doc.last_name,
            // An empty string counts as "no image", same as absent.
            image_url: doc
                .image_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_owned()),
            classification: doc.classification.unwrap_or_default(),
            relationship_status: doc.relationship_status.unwrap_or_default(),
            email: doc.email.unwrap_or_default(),
            phone: doc.phone.unwrap_or_default(),
            officer_title: doc.officer.filter(|title| !title.is_empty()),
            show_email: doc.show_email.unwrap_or(false),
            show_phone: doc.show_phone.unwrap_or(false),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sparse_doc() -> MemberDocument {
        serde_json::from_str(r#"{"$id":"1","firstName":"Ann","lastName":"Lee"}"#).unwrap()
    }

    #[test]
    fn test_defaults_substituted_for_absent_fields() {
        let record = MemberRecord::from(sparse_doc());
        assert_eq!(record.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(record.classification, "");
        assert_eq!(record.relationship_status, "");
        assert_eq!(record.email, "");
        assert_eq!(record.phone, "");
        assert_eq!(record.officer_title, None);
        assert!(!record.show_email);
        assert!(!record.show_phone);
    }

    #[test]
    fn test_mapping_is_pure() {
        let a = MemberRecord::from(sparse_doc());
        let b = MemberRecord::from(sparse_doc());
        assert_eq!(a, b);
    }

    #[test]
    fn test_visibility_optin_record() {
        let doc: MemberDocument = serde_json::from_str(
            r#"{"$id":"1","firstName":"Ann","lastName":"Lee","showEmail":true,"email":"a@x.com"}"#,
        )
        .unwrap();
        let record = MemberRecord::from(doc);

        assert_eq!(record.id, MemberId::new("1"));
        assert_eq!(record.first_name, "Ann");
        assert_eq!(record.last_name, "Lee");
        assert_eq!(record.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(record.email, "a@x.com");
        assert!(record.show_email);
        assert!(!record.show_phone);
    }

    #[test]
    fn test_empty_strings_count_as_absent_for_image_and_office() {
        let doc: MemberDocument = serde_json::from_str(
            r#"{"$id":"2","firstName":"Dan","lastName":"Roe","imageURL":"","officer":""}"#,
        )
        .unwrap();
        let record = MemberRecord::from(doc);
        assert_eq!(record.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(record.officer_title, None);
        assert!(!record.is_officer());
    }

    #[test]
    fn test_officer_title_survives() {
        let doc: MemberDocument = serde_json::from_str(
            r#"{"$id":"3","firstName":"Sue","lastName":"Kim","officer":"President"}"#,
        )
        .unwrap();
        let record = MemberRecord::from(doc);
        assert_eq!(record.officer_title.as_deref(), Some("President"));
        assert!(record.is_officer());
    }
}
