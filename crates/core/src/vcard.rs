//! Contact export as vCard 3.0 text.
//!
//! The record layout is fixed; values are escaped for the vCard text format
//! so a field can never start a new property line.

use std::fmt::Write as _;

use crate::UserRecord;

/// MIME type of the exported file.
pub const MIME_TYPE: &str = "text/vcard";

/// File extension of the exported file.
pub const FILE_EXTENSION: &str = "vcf";

/// File stem used when the record has no name.
pub const FALLBACK_FILE_STEM: &str = "contacto";

/// Note attached to every exported contact.
pub const CONTACT_NOTE: &str = "Contacto agregado desde tarjeta digital";

/// Errors that can occur while exporting a contact.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The record has no phone number, so there is nothing worth saving.
    #[error("no phone number available for this contact")]
    MissingPhone,

    /// Writing the export file failed.
    #[error("failed to write contact file: {0}")]
    Io(#[from] std::io::Error),
}

/// A contact ready to be written as vCard text.
///
/// Values are kept raw; escaping happens in [`ContactCard::to_vcard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub display_name: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub url: Option<String>,
}

impl ContactCard {
    /// Build a contact from a fetched record.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::MissingPhone` if the phone number is absent or
    /// the placeholder.
    pub fn from_record(record: &UserRecord) -> Result<Self, ExportError> {
        let phone = record.phone_number().ok_or(ExportError::MissingPhone)?;

        Ok(Self {
            display_name: record.display_name().unwrap_or_default(),
            organization: record.organization().unwrap_or_default().to_owned(),
            title: record.title().unwrap_or_default().to_owned(),
            phone: phone.to_owned(),
            email: record.email().unwrap_or_default().to_owned(),
            url: record.primary_url().map(str::to_owned),
        })
    }

    /// Given name: the first whitespace-separated token of the display name.
    #[must_use]
    pub fn given_name(&self) -> &str {
        self.display_name.split_whitespace().next().unwrap_or_default()
    }

    /// Family name: every token after the first, single-space joined.
    #[must_use]
    pub fn family_name(&self) -> String {
        self.display_name
            .split_whitespace()
            .skip(1)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render the contact as vCard 3.0 text with CRLF line endings.
    #[must_use]
    pub fn to_vcard(&self) -> String {
        let mut out = String::new();
        let mut line = |property: &str, value: &str| {
            // Writing to a String cannot fail
            let _ = write!(out, "{property}:{value}\r\n");
        };

        line("BEGIN", "VCARD");
        line("VERSION", "3.0");
        line("FN", &escape_value(&self.display_name));
        line(
            "N",
            &format!(
                "{};{};;;",
                escape_value(&self.family_name()),
                escape_value(self.given_name())
            ),
        );
        line("ORG", &escape_value(&self.organization));
        line("TITLE", &escape_value(&self.title));
        line("TEL;TYPE=CELL", &escape_value(&self.phone));
        line("EMAIL", &escape_value(&self.email));
        if let Some(url) = &self.url {
            line("URL", &escape_value(url));
        }
        line("NOTE", &escape_value(CONTACT_NOTE));
        line("END", "VCARD");

        out
    }

    /// File name for the export: display name with whitespace runs turned
    /// into underscores, plus the `.vcf` extension.
    #[must_use]
    pub fn file_name(&self) -> String {
        let stem = self
            .display_name
            .split_whitespace()
            .map(sanitize_file_component)
            .collect::<Vec<_>>()
            .join("_");

        let stem = if stem.is_empty() || stem.chars().all(|c| c == '.' || c == '_') {
            FALLBACK_FILE_STEM.to_owned()
        } else {
            stem
        };

        format!("{stem}.{FILE_EXTENSION}")
    }
}

/// Escape a value for a vCard text property.
///
/// Backslash, semicolon and comma are backslash-escaped; any line break
/// (CRLF, CR or LF) becomes the two-character sequence `\n`.
#[must_use]
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }

    out
}

fn sanitize_file_component(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
