//! Element-set snapshots and rollback
//!
//! A backup is an owned deep copy of the element set taken before an
//! application, fingerprinted with SHA-256 over its JSON form so a tampered or
//! corrupted snapshot is refused at rollback.

use crate::error::{Result, TemplateError};
use crate::types::MetaContractElement;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementBackup {
    pub elements: Vec<MetaContractElement>,
    /// Hex SHA-256 of `elements` serialized as JSON
    pub checksum: String,
}

impl ElementBackup {
    pub fn capture(elements: &[MetaContractElement]) -> Self {
        let elements = elements.to_vec();
        let checksum = checksum(&elements);
        Self { elements, checksum }
    }

    /// True when the content still matches the recorded checksum
    pub fn verify(&self) -> bool {
        checksum(&self.elements) == self.checksum
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Content hash of an element set
pub fn checksum(elements: &[MetaContractElement]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(elements).unwrap_or_default());
    hex::encode(hasher.finalize())
}

/// Restore a fresh, independent copy of the backed-up elements
pub fn rollback(backup: Option<&ElementBackup>) -> Result<Vec<MetaContractElement>> {
    let backup = backup.ok_or(TemplateError::MissingBackup)?;

    let computed = checksum(&backup.elements);
    if computed != backup.checksum {
        return Err(TemplateError::BackupChecksumMismatch {
            stored: backup.checksum.clone(),
            computed,
        });
    }

    tracing::info!("Rolled back to {} elements", backup.len());
    Ok(backup.elements.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn sample() -> Vec<MetaContractElement> {
        catalog::builtin_templates()[0].elements().to_vec()
    }

    #[test]
    fn test_capture_is_deep_copy() {
        let mut elements = sample();
        let backup = ElementBackup::capture(&elements);
        elements[0].name = "changed".to_string();

        assert_ne!(backup.elements[0].name, "changed");
        assert!(backup.verify());
    }

    #[test]
    fn test_rollback_round_trip() {
        let backup = ElementBackup::capture(&sample());
        let first = rollback(Some(&backup)).unwrap();
        let second = rollback(Some(&backup)).unwrap();

        assert_eq!(first, backup.elements);
        assert_eq!(first, second);
        assert!(!std::ptr::eq(first.as_ptr(), backup.elements.as_ptr()));
        assert!(!std::ptr::eq(first.as_ptr(), second.as_ptr()));
    }

    #[test]
    fn test_rollback_without_backup_fails() {
        let err = rollback(None).unwrap_err();
        assert!(matches!(err, TemplateError::MissingBackup));
        assert_eq!(err.to_string(), "No backup available for rollback");
    }

    #[test]
    fn test_rollback_rejects_tampered_backup() {
        let mut backup = ElementBackup::capture(&sample());
        backup.elements.pop();

        assert!(!backup.verify());
        let err = rollback(Some(&backup)).unwrap_err();
        assert!(matches!(err, TemplateError::BackupChecksumMismatch { .. }));
    }

    #[test]
    fn test_empty_backup() {
        let backup = ElementBackup::capture(&[]);
        assert!(backup.is_empty());
        assert_eq!(rollback(Some(&backup)).unwrap(), Vec::<MetaContractElement>::new());
    }

    #[test]
    fn test_checksum_survives_serde() {
        let backup = ElementBackup::capture(&sample());
        let json = serde_json::to_string(&backup).unwrap();
        let parsed: ElementBackup = serde_json::from_str(&json).unwrap();
        assert!(parsed.verify());
        assert_eq!(parsed.checksum.len(), 64);
    }
}
