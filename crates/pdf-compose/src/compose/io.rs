//! Document I/O
//!
//! Uploads are parsed from memory and results are serialized back to bytes;
//! nothing touches the filesystem here.

use crate::types::*;
use lopdf::Document;

/// Parse an uploaded PDF, rejecting encrypted and page-less documents.
pub fn load_pdf_bytes(asset: &PdfAsset) -> Result<Document> {
    let invalid = |reason: String| ComposeError::InvalidDocument {
        name: asset.filename.clone(),
        reason,
    };

    let doc = Document::load_mem(&asset.bytes).map_err(|e| invalid(e.to_string()))?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(invalid("encrypted documents are not supported".to_string()));
    }
    if doc.get_pages().is_empty() {
        return Err(invalid("document has no pages".to_string()));
    }

    Ok(doc)
}

/// Parse an uploaded PDF on the blocking pool
pub async fn load_pdf(asset: PdfAsset) -> Result<Document> {
    tokio::task::spawn_blocking(move || load_pdf_bytes(&asset)).await?
}

/// Serialize a finished document with compressed streams
pub fn save_pdf_bytes(mut doc: Document) -> Result<Vec<u8>> {
    doc.compress();
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}
