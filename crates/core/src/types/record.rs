//! The profile record shown on a card.

use serde::{Deserialize, Serialize};

use crate::display::{is_valid_url, meaningful};

/// A profile document as stored in the `users` collection.
///
/// Field names on the wire follow the document schema. Every field is
/// optional; the accessors apply the "no value" rule (absent, blank or
/// placeholder) so views never see the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "Nombres", default, skip_serializing_if = "Option::is_none")]
    pub given_names: Option<String>,
    #[serde(rename = "Apellidos", default, skip_serializing_if = "Option::is_none")]
    pub family_names: Option<String>,
    #[serde(rename = "Cargo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Empresa", default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "NroCelular", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "WebSyte", default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(rename = "LinkedInUrl", default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(rename = "PhotoUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Free-form display string, never parsed.
    #[serde(rename = "FechaNac", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Unix timestamp (seconds or milliseconds) encoded as a string.
    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "City", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "TipoSangre", default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(rename = "IsActive", default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<String>,
}

macro_rules! value_accessors {
    ($($field:ident),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($field), "` if it carries a value.")]
            #[must_use]
            pub fn $field(&self) -> Option<&str> {
                meaningful(self.$field.as_deref())
            }
        )*
    };
}

impl UserRecord {
    value_accessors!(
        given_names,
        family_names,
        title,
        organization,
        email,
        phone_number,
        website_url,
        linkedin_url,
        photo_url,
        birth_date,
        created_at,
        city,
        blood_type,
        is_active,
    );

    /// Given and family names joined by a single space.
    ///
    /// Returns `None` when neither part has a value.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.given_names(), self.family_names()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// LinkedIn URL when valid, else the website URL when valid.
    #[must_use]
    pub fn primary_url(&self) -> Option<&str> {
        self.valid_linkedin_url().or_else(|| self.valid_website_url())
    }

    /// LinkedIn URL, only if it is a well-formed absolute URL.
    #[must_use]
    pub fn valid_linkedin_url(&self) -> Option<&str> {
        self.linkedin_url().filter(|u| is_valid_url(u))
    }

    /// Website URL, only if it is a well-formed absolute URL.
    #[must_use]
    pub fn valid_website_url(&self) -> Option<&str> {
        self.website_url().filter(|u| is_valid_url(u))
    }

    /// Photo URL, only if it is a well-formed absolute URL.
    #[must_use]
    pub fn valid_photo_url(&self) -> Option<&str> {
        self.photo_url().filter(|u| is_valid_url(u))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::display::PLACEHOLDER;

    fn sample() -> UserRecord {
        serde_json::from_value(serde_json::json!({
            "Nombres": "Pedro",
            "Apellidos": "García López",
            "Cargo": "Director De Tienda",
            "Empresa": "AJE",
            "Email": "pedro@example.com",
            "NroCelular": "+51 999 888 777",
            "WebSyte": "www.example.com",
            "LinkedInUrl": "https://www.linkedin.com/in/pedro",
            "PhotoUrl": PLACEHOLDER,
            "FechaNac": "12 de mayo",
            "CreatedAt": "1615766400",
            "TipoSangre": "O+",
            "IsActive": "true",
            "Unrelated": "ignored"
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_document_schema() {
        let record = sample();
        assert_eq!(record.given_names(), Some("Pedro"));
        assert_eq!(record.family_names(), Some("García López"));
        assert_eq!(record.title(), Some("Director De Tienda"));
        assert_eq!(record.phone_number(), Some("+51 999 888 777"));
        assert_eq!(record.blood_type(), Some("O+"));
        assert_eq!(record.city(), None);
    }

    #[test]
    fn test_placeholder_is_not_a_value() {
        let record = sample();
        assert_eq!(record.photo_url.as_deref(), Some(PLACEHOLDER));
        assert_eq!(record.photo_url(), None);
        assert_eq!(record.valid_photo_url(), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(sample().display_name().as_deref(), Some("Pedro García López"));

        let only_family = UserRecord {
            family_names: Some("Quispe".to_string()),
            given_names: Some(PLACEHOLDER.to_string()),
            ..UserRecord::default()
        };
        assert_eq!(only_family.display_name().as_deref(), Some("Quispe"));

        assert_eq!(UserRecord::default().display_name(), None);
    }

    #[test]
    fn test_primary_url_prefers_linkedin() {
        let record = sample();
        assert_eq!(record.primary_url(), Some("https://www.linkedin.com/in/pedro"));
    }

    #[test]
    fn test_primary_url_falls_back_to_valid_website() {
        let record = UserRecord {
            linkedin_url: Some("linkedin.com/in/pedro".to_string()),
            website_url: Some("https://example.com".to_string()),
            ..UserRecord::default()
        };
        assert_eq!(record.primary_url(), Some("https://example.com"));

        let neither = UserRecord {
            website_url: Some("www.example.com".to_string()),
            ..UserRecord::default()
        };
        assert_eq!(neither.primary_url(), None);
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let record = UserRecord {
            email: Some("a@b.c".to_string()),
            ..UserRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "Email": "a@b.c" }));
    }
}
