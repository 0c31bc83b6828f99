//! Loading and saving PDF documents
//!
//! Thin layer over lopdf that maps its errors into [`SignError`] and offers
//! zero-based page lookup.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};

use crate::error::SignError;

/// Parse PDF bytes into a mutable document graph
pub fn load(bytes: &[u8]) -> Result<Document, SignError> {
    Document::load_mem(bytes).map_err(|e| SignError::Parse(e.to_string()))
}

/// Serialize a document back to PDF bytes
pub fn save(document: &mut Document) -> Result<Vec<u8>, SignError> {
    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|e| SignError::Serialize(e.to_string()))?;
    Ok(output)
}

pub fn page_count(document: &Document) -> usize {
    document.get_pages().len()
}

/// Object id of the page at zero-based `page_index`
pub fn page_id(document: &Document, page_index: usize) -> Result<ObjectId, SignError> {
    let pages = document.get_pages();
    let page_count = pages.len();
    pages
        .into_values()
        .nth(page_index)
        .ok_or(SignError::PageNotFound {
            index: page_index,
            page_count,
        })
}

/// Ids of the content streams a page paints, in paint order.
///
/// `/Contents` may be a stream reference, an inline array of references, or a
/// reference to an array object.
pub fn content_stream_ids(document: &Document, page_id: ObjectId) -> Vec<ObjectId> {
    let Ok(page) = document.get_dictionary(page_id) else {
        return Vec::new();
    };
    let Ok(contents) = page.get(b"Contents") else {
        return Vec::new();
    };

    let refs = match contents {
        Object::Reference(id) => match document.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Object::Array(items) => items.clone(),
        _ => Vec::new(),
    };

    refs.into_iter()
        .filter_map(|obj| match obj {
            Object::Reference(id) => Some(id),
            _ => None,
        })
        .filter(|id| matches!(document.get_object(*id), Ok(Object::Stream(_))))
        .collect()
}

/// Concatenated, decompressed bytes of every content stream on the page
pub fn page_content(document: &Document, page_index: usize) -> Result<Vec<u8>, SignError> {
    let id = page_id(document, page_index)?;
    let mut bytes = Vec::new();
    for stream_id in content_stream_ids(document, id) {
        let stream = document
            .get_object(stream_id)
            .and_then(Object::as_stream)
            .map_err(|e| SignError::Parse(e.to_string()))?;
        // Unfiltered streams report an error here; their raw bytes are the content
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        if !bytes.is_empty() {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(&data);
    }
    Ok(bytes)
}

/// Decode every operator the page paints, across all of its content streams
pub fn page_operations(
    document: &Document,
    page_index: usize,
) -> Result<Vec<Operation>, SignError> {
    let bytes = page_content(document, page_index)?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let content = Content::decode(&bytes).map_err(|e| SignError::Parse(e.to_string()))?;
    Ok(content.operations)
}
