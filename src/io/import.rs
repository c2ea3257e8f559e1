use anyhow::{Context, Result};
use std::io::Read;

use crate::application::LedgerService;
use crate::io::export::LedgerSnapshot;

/// Importer for rebuilding a ledger from exported data
pub struct Importer;

impl Importer {
    /// Rebuild a ledger from a JSON snapshot written by
    /// [`Exporter::export_full_json`](crate::io::Exporter::export_full_json).
    pub fn import_full_json<R: Read>(mut reader: R) -> Result<LedgerService> {
        let mut json = String::new();
        reader
            .read_to_string(&mut json)
            .context("Failed to read snapshot")?;

        let snapshot: LedgerSnapshot =
            serde_json::from_str(&json).context("Failed to parse JSON snapshot")?;
        if snapshot.version != env!("CARGO_PKG_VERSION") {
            tracing::warn!(
                snapshot_version = %snapshot.version,
                "importing snapshot written by a different version"
            );
        }

        let service = LedgerService::from_snapshot(snapshot)
            .context("Snapshot violates ledger invariants")?;
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::io::Exporter;

    #[test]
    fn test_import_restores_exported_ledger() {
        let mut original = LedgerService::new();
        original.register_account("+992000000001").unwrap();
        original.deposit(1, 900).unwrap();
        let payment = original.pay(1, 400, "mobile").unwrap();
        let favorite = original.favorite_payment(&payment.id, "Mobile").unwrap();
        original.reject(&payment.id).unwrap();

        let mut json = Vec::new();
        Exporter::new(&original).export_full_json(&mut json).unwrap();
        let mut restored = Importer::import_full_json(json.as_slice()).unwrap();

        assert_eq!(restored.accounts(), original.accounts());
        assert_eq!(restored.payments(), original.payments());
        assert_eq!(restored.favorites(), original.favorites());
        assert_eq!(restored.find_favorite_by_id(&favorite.id).unwrap().name, "Mobile");

        let next = restored.register_account("+992000000002").unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_import_rejects_duplicate_phones() {
        let json = r#"{
            "version": "0.1.0",
            "exported_at": "2024-01-01T00:00:00Z",
            "last_account_id": 2,
            "accounts": [
                {"id": 1, "phone": "+992000000001", "balance": 0},
                {"id": 2, "phone": "+992000000001", "balance": 0}
            ],
            "payments": [],
            "favorites": []
        }"#;

        let err = Importer::import_full_json(json.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::DuplicatePhone(_))
        ));
    }

    #[test]
    fn test_import_rejects_dangling_payment() {
        let json = r#"{
            "version": "0.1.0",
            "exported_at": "2024-01-01T00:00:00Z",
            "last_account_id": 1,
            "accounts": [{"id": 1, "phone": "+992000000001", "balance": 0}],
            "payments": [
                {"id": "p1", "account_id": 9, "amount": 10, "category": "food", "status": "OK"}
            ],
            "favorites": []
        }"#;

        let err = Importer::import_full_json(json.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        assert!(Importer::import_full_json("not json".as_bytes()).is_err());
    }
}
