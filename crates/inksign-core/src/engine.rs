//! Signature injection
//!
//! Strokes are translated into path operators and written as one extra
//! content stream appended after the page's existing streams. Each stroke is
//! wrapped in its own `q`/`Q` pair so its color and width never leak into
//! later strokes or anything painted afterwards.

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::document::{self, load, save};
use crate::error::SignError;
use crate::ops::PathOp;
use crate::stroke::{validate_strokes, Stroke};

/// Line width for every stroke, in user-space units
pub const LINE_WIDTH: f32 = 2.0;

/// Translate strokes into operators, one balanced group per stroke.
///
/// Callers are expected to have validated the strokes first.
pub fn stroke_operations(strokes: &[Stroke]) -> Vec<PathOp> {
    let mut ops = Vec::new();
    for stroke in strokes {
        push_stroke(&mut ops, stroke);
    }
    ops
}

fn push_stroke(ops: &mut Vec<PathOp>, stroke: &Stroke) {
    let color = stroke.color;

    ops.push(PathOp::SaveState);
    ops.push(PathOp::SetStrokeRgb(
        color.r as f32,
        color.g as f32,
        color.b as f32,
    ));
    ops.push(PathOp::SetLineWidth(LINE_WIDTH));

    // A lone point has nothing to stroke; keep the state pair but no path
    if let [first, rest @ ..] = stroke.points.as_slice() {
        if !rest.is_empty() {
            ops.push(PathOp::MoveTo(first.x as f32, first.y as f32));
            ops.extend(rest.iter().map(|p| PathOp::LineTo(p.x as f32, p.y as f32)));
            ops.push(PathOp::StrokePath);
        }
    }

    ops.push(PathOp::RestoreState);
}

/// Paint `strokes` onto the page at zero-based `page_index`.
///
/// The input document is left untouched; the signed copy is returned. All
/// strokes are validated before anything is appended, so an error never
/// leaves a partially signed page behind.
pub fn apply_strokes(
    document: &Document,
    page_index: usize,
    strokes: &[Stroke],
) -> Result<Document, SignError> {
    let page_id = document::page_id(document, page_index)?;
    validate_strokes(strokes)?;

    if strokes.is_empty() {
        return Ok(document.clone());
    }

    let ops = stroke_operations(strokes);
    let content: Content = Content {
        operations: ops.iter().map(PathOp::to_operation).collect(),
    };
    let encoded = content
        .encode()
        .map_err(|e| SignError::Serialize(e.to_string()))?;

    // Leading newline keeps the first operator from fusing with the last
    // token of the previous stream when readers concatenate them
    let mut bytes = Vec::with_capacity(encoded.len() + 1);
    bytes.push(b'\n');
    bytes.extend_from_slice(&encoded);

    let mut signed = document.clone();
    let stream_id = signed.add_object(Stream::new(Dictionary::new(), bytes));
    append_content_stream(&mut signed, page_id, stream_id)?;

    debug!(
        page_index,
        strokes = strokes.len(),
        operators = ops.len(),
        "Appended signature content stream {:?}",
        stream_id
    );

    Ok(signed)
}

/// Load, sign and re-serialize in one step.
///
/// With no strokes the bytes are still parsed and the page checked, but the
/// input is returned as-is.
pub fn sign_document(
    bytes: &[u8],
    page_index: usize,
    strokes: &[Stroke],
) -> Result<Vec<u8>, SignError> {
    let document = load(bytes)?;
    let mut signed = apply_strokes(&document, page_index, strokes)?;

    if strokes.is_empty() {
        return Ok(bytes.to_vec());
    }

    save(&mut signed)
}

/// Add `stream_id` after every existing content stream of the page
fn append_content_stream(
    doc: &mut Document,
    page_id: ObjectId,
    stream_id: ObjectId,
) -> Result<(), SignError> {
    let existing = doc
        .get_dictionary(page_id)
        .map_err(|e| SignError::Parse(e.to_string()))?
        .get(b"Contents")
        .ok()
        .cloned();

    let contents = match existing {
        Some(Object::Reference(existing_id)) => match doc.get_object(existing_id) {
            // Other pages may point at the same array object, so the page
            // gets its own inline copy instead
            Ok(Object::Array(items)) => {
                let mut items = items.clone();
                items.push(Object::Reference(stream_id));
                Object::Array(items)
            }
            _ => Object::Array(vec![
                Object::Reference(existing_id),
                Object::Reference(stream_id),
            ]),
        },
        Some(Object::Array(mut items)) => {
            items.push(Object::Reference(stream_id));
            Object::Array(items)
        }
        _ => Object::Reference(stream_id),
    };

    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| SignError::Parse(e.to_string()))?
        .set("Contents", contents);

    Ok(())
}
