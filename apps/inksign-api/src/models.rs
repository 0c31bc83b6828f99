//! Data models for InkSign API

use chrono::{DateTime, Utc};
use inksign_core::Stroke;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored document metadata
#[derive(Debug, Clone, FromRow)]
pub struct DbRecord {
    pub id: String,
    pub filename: String,
    pub file_path: String,
    pub document_hash: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub signed_at: Option<DateTime<Utc>>,
}

/// Document record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfRecord {
    pub id: String,
    pub filename: String,
    pub document_hash: String,
    pub size_bytes: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "signedAt")]
    pub signed_at: Option<DateTime<Utc>>,
}

impl From<DbRecord> for PdfRecord {
    fn from(record: DbRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename,
            document_hash: record.document_hash,
            size_bytes: record.size_bytes,
            created_at: record.created_at,
            updated_at: record.updated_at,
            signed_at: record.signed_at,
        }
    }
}

/// Request to paint signature strokes onto a stored document
#[derive(Debug, Clone, Deserialize)]
pub struct AddSignatureRequest {
    #[serde(rename = "signatureData")]
    pub signature_data: Vec<Stroke>,
    /// Zero-based page to sign; the first page when absent
    #[serde(default)]
    pub page: usize,
}

/// Response from a signature request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureResponse {
    pub success: bool,
    pub id: String,
    pub page: usize,
    #[serde(rename = "strokesApplied")]
    pub strokes_applied: usize,
    /// When the document was last signed; unchanged by an empty request
    #[serde(rename = "signedAt")]
    pub signed_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use inksign_core::Rgb;

    #[test]
    fn test_add_signature_request_from_browser_payload() {
        let json = r#"{
            "signatureData": [
                {"color": {"r": 0, "g": 0, "b": 1}, "curve": [{"x": 10, "y": 20}, {"x": 30, "y": 40}]}
            ]
        }"#;
        let req: AddSignatureRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.page, 0);
        assert_eq!(req.signature_data.len(), 1);
        assert_eq!(req.signature_data[0].color, Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(req.signature_data[0].points.len(), 2);
    }

    #[test]
    fn test_add_signature_request_with_page() {
        let json = r#"{"signatureData": [], "page": 2}"#;
        let req: AddSignatureRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.page, 2);
        assert!(req.signature_data.is_empty());
    }

    #[test]
    fn test_record_hides_storage_path() {
        let now = Utc::now();
        let record = PdfRecord::from(DbRecord {
            id: "id-1".into(),
            filename: "lease.pdf".into(),
            file_path: "uploads/1234.pdf".into(),
            document_hash: "ab".repeat(32),
            size_bytes: 42,
            created_at: now,
            updated_at: now,
            signed_at: None,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("file_path").is_none());
        assert_eq!(json["filename"], "lease.pdf");
        assert!(json["signedAt"].is_null());
    }
}
