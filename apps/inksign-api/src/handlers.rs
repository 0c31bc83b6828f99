//! HTTP handlers for InkSign API

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;
use crate::storage::FileStore;

/// Multipart field carrying the PDF, as sent by the web client
const PDF_FIELD: &str = "pdfFile";

type PdfBody = (StatusCode, [(HeaderName, String); 2], Vec<u8>);

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Upload a new document
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PdfRecord>), ApiError> {
    let (filename, pdf_data) = read_pdf_field(multipart).await?;
    let pdf_data = ensure_parses(pdf_data).await?;

    let id = Uuid::new_v4().to_string();
    let file_path = FileStore::storage_name(&id, &filename);
    state.files.write_atomic(&file_path, &pdf_data).await?;

    let now = Utc::now();
    let record = DbRecord {
        id,
        filename,
        file_path,
        document_hash: document_hash(&pdf_data),
        size_bytes: pdf_data.len() as i64,
        created_at: now,
        updated_at: now,
        signed_at: None,
    };

    sqlx::query(
        r#"
        INSERT INTO pdf_records (id, filename, file_path, document_hash, size_bytes, created_at, updated_at, signed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.filename)
    .bind(&record.file_path)
    .bind(&record.document_hash)
    .bind(record.size_bytes)
    .bind(record.created_at)
    .bind(record.updated_at)
    .bind(record.signed_at)
    .execute(&state.db)
    .await?;

    tracing::info!(
        "Uploaded {} as {} ({} bytes)",
        record.filename,
        record.id,
        record.size_bytes
    );

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// List all stored documents, newest first
pub async fn list_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PdfRecord>>, ApiError> {
    let records: Vec<DbRecord> = sqlx::query_as(
        r#"
        SELECT id, filename, file_path, document_hash, size_bytes, created_at, updated_at, signed_at
        FROM pdf_records
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(records.into_iter().map(PdfRecord::from).collect()))
}

/// Serve a document for inline rendering
pub async fn view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<PdfBody, ApiError> {
    let record = fetch_record(&state, &id).await?;
    let pdf_data = state.files.read(&record.file_path).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", record.filename),
            ),
        ],
        pdf_data,
    ))
}

/// Serve a document as a named attachment
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<PdfBody, ApiError> {
    let record = fetch_record(&state, &id).await?;
    let pdf_data = state.files.read(&record.file_path).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", record.filename),
            ),
        ],
        pdf_data,
    ))
}

/// Replace a document's bytes and filename
pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<PdfRecord>, ApiError> {
    // Receive and check the upload before taking the lock
    let (filename, pdf_data) = read_pdf_field(multipart).await?;
    let pdf_data = ensure_parses(pdf_data).await?;

    let _guard = state.locks.acquire(&id).await;
    let mut record = fetch_record(&state, &id).await?;

    state.files.write_atomic(&record.file_path, &pdf_data).await?;

    record.filename = filename;
    record.document_hash = document_hash(&pdf_data);
    record.size_bytes = pdf_data.len() as i64;
    record.updated_at = Utc::now();
    record.signed_at = None;

    sqlx::query(
        r#"
        UPDATE pdf_records
        SET filename = ?, document_hash = ?, size_bytes = ?, updated_at = ?, signed_at = NULL
        WHERE id = ?
        "#,
    )
    .bind(&record.filename)
    .bind(&record.document_hash)
    .bind(record.size_bytes)
    .bind(record.updated_at)
    .bind(&record.id)
    .execute(&state.db)
    .await?;

    tracing::info!("Replaced document {} with {}", record.id, record.filename);

    Ok(Json(record.into()))
}

/// Paint signature strokes onto a stored document
pub async fn add_signature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddSignatureRequest>,
) -> Result<Json<SignatureResponse>, ApiError> {
    let _guard = state.locks.acquire(&id).await;
    let record = fetch_record(&state, &id).await?;
    let pdf_data = state.files.read(&record.file_path).await?;

    let page = req.page;
    let strokes = req.signature_data;
    let stroke_count = strokes.len();

    let task = tokio::task::spawn_blocking(move || {
        inksign_core::sign_document(&pdf_data, page, &strokes)
    });
    let joined = match state.config.sign_timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| ApiError::Timeout(limit.as_millis()))?,
        None => task.await,
    };
    let signed = joined.map_err(|e| ApiError::Internal(e.into()))??;

    let mut signed_at = record.signed_at;
    if stroke_count > 0 {
        let now = Utc::now();
        signed_at = Some(now);
        state.files.write_atomic(&record.file_path, &signed).await?;

        sqlx::query(
            r#"
            UPDATE pdf_records
            SET document_hash = ?, size_bytes = ?, updated_at = ?, signed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(document_hash(&signed))
        .bind(signed.len() as i64)
        .bind(now)
        .bind(now)
        .bind(&record.id)
        .execute(&state.db)
        .await?;
    }

    tracing::info!(
        "Signed document {} page {} with {} strokes",
        record.id,
        page,
        stroke_count
    );

    Ok(Json(SignatureResponse {
        success: true,
        id: record.id,
        page,
        strokes_applied: stroke_count,
        signed_at,
        message: Some("Signature added successfully".to_string()),
    }))
}

async fn fetch_record(state: &AppState, id: &str) -> Result<DbRecord, ApiError> {
    let record: Option<DbRecord> = sqlx::query_as(
        r#"
        SELECT id, filename, file_path, document_hash, size_bytes, created_at, updated_at, signed_at
        FROM pdf_records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    record.ok_or_else(|| ApiError::DocumentNotFound(id.to_string()))
}

/// Pull the PDF file part out of a multipart body
async fn read_pdf_field(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or_default());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {}", e)))?;

        if data.is_empty() {
            return Err(ApiError::InvalidRequest("Uploaded file is empty".into()));
        }
        return Ok((filename, data.to_vec()));
    }

    Err(ApiError::InvalidRequest(format!(
        "Missing multipart field '{}'",
        PDF_FIELD
    )))
}

/// Reject bytes that are not a loadable PDF
async fn ensure_parses(pdf_data: Vec<u8>) -> Result<Vec<u8>, ApiError> {
    tokio::task::spawn_blocking(move || inksign_core::load(&pdf_data).map(|_| pdf_data))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::from)
}

fn document_hash(pdf_data: &[u8]) -> String {
    hex::encode(Sha256::digest(pdf_data))
}

/// Display name safe to echo in a Content-Disposition header
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}
