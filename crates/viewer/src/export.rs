//! Contact export to a `.vcf` file.

use std::path::{Path, PathBuf};

use bizcard_core::UserRecord;
use bizcard_core::vcard::{ContactCard, ExportError};

/// Write the record's contact card into `dir` and return the file path.
///
/// Nothing is written when the record has no phone number. An existing
/// file is never replaced: the card goes to the first free
/// `<name> (n).vcf` instead, the way browsers number repeated downloads.
///
/// # Errors
///
/// Returns `ExportError::MissingPhone` without a phone number, or
/// `ExportError::Io` if the file cannot be written.
pub fn export_contact(record: &UserRecord, dir: &Path) -> Result<PathBuf, ExportError> {
    let card = ContactCard::from_record(record)?;

    std::fs::create_dir_all(dir)?;
    let path = free_path(dir, &card.file_name());

    // Write through a temporary sibling so a failed write leaves no partial card
    let tmp = path.with_extension("vcf.tmp");
    if let Err(e) = std::fs::write(&tmp, card.to_vcard()) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    std::fs::rename(&tmp, &path)?;

    tracing::info!(path = %path.display(), "Exported contact");
    Ok(path)
}

/// First path in `dir` for `file_name` that does not exist yet.
fn free_path(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    if !path.exists() {
        return path;
    }

    let stem = file_name.strip_suffix(".vcf").unwrap_or(file_name);
    (1u32..)
        .map(|n| dir.join(format!("{stem} ({n}).vcf")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}
