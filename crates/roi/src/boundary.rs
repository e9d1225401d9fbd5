//! Carries a shape's boundary type through the remote store, which has no
//! boundary concept of its own.
//!
//! Two channels are written: a token appended to the shape's free text and a
//! tag annotation named [`BOUNDARY_KEY`]. Decoding prefers the annotation and
//! falls back to the text token, then to a per-kind default.

use std::str::FromStr;

use crate::{
    types::BoundaryType,
    wire::{ShapeKind, TagAnnotation, WireShape},
};

pub const CLOSED_TOKEN: &str = "ij-bt:[C]";
pub const OPEN_TOKEN: &str = "ij-bt:[O]";
pub const UNSPECIFIED_TOKEN: &str = "ij-bt:[U]";

/// Annotation name holding the boundary type.
pub const BOUNDARY_KEY: &str = "boundaryType";

pub fn token(boundary: BoundaryType) -> &'static str {
    match boundary {
        BoundaryType::Closed => CLOSED_TOKEN,
        BoundaryType::Open => OPEN_TOKEN,
        BoundaryType::Unspecified => UNSPECIFIED_TOKEN,
    }
}

fn parse_token(token: &str) -> Option<BoundaryType> {
    match token {
        CLOSED_TOKEN => Some(BoundaryType::Closed),
        OPEN_TOKEN => Some(BoundaryType::Open),
        UNSPECIFIED_TOKEN => Some(BoundaryType::Unspecified),
        _ => None,
    }
}

/// Boundary assumed for records that never went through [`encode`].
pub fn default_for(kind: ShapeKind) -> BoundaryType {
    match kind {
        ShapeKind::Polygon | ShapeKind::RasterMask => BoundaryType::Unspecified,
        _ => BoundaryType::Closed,
    }
}

/// Splits trailing boundary tokens off `text`, returning the free text.
/// Only a whole text token or a ` <token>` suffix is removed; any other
/// whitespace belongs to the free text.
pub fn free_text(text: &str) -> &str {
    let mut rest = text;
    loop {
        let stripped = [CLOSED_TOKEN, OPEN_TOKEN, UNSPECIFIED_TOKEN].iter().find_map(|token| {
            let head = rest.strip_suffix(token)?;
            match head.strip_suffix(' ') {
                Some(free) => Some(free),
                None if head.is_empty() => Some(head),
                None => None,
            }
        });
        match stripped {
            Some(head) => rest = head,
            None => return rest,
        }
    }
}

/// Writes `boundary` into `shape`, with `free_text` as the leading text.
/// Returns the text written.
pub fn encode<'a>(shape: &'a mut WireShape, boundary: BoundaryType, free: &str) -> &'a str {
    let free = free_text(free);
    shape.text = if free.is_empty() {
        token(boundary).to_string()
    } else {
        format!("{free} {}", token(boundary))
    };

    let value = boundary.to_string();
    match shape.annotations.iter_mut().find(|a| a.name == BOUNDARY_KEY) {
        Some(tag) => tag.value = value,
        None => shape.annotations.push(TagAnnotation { name: BOUNDARY_KEY.to_string(), value }),
    }
    &shape.text
}

/// Reads the boundary type back from `shape`.
pub fn decode(shape: &WireShape) -> BoundaryType {
    if let Some(tag) = shape.annotation(BOUNDARY_KEY) {
        // Unknown values read as closed.
        return BoundaryType::from_str(tag.value.trim()).unwrap_or(BoundaryType::Closed);
    }
    shape
        .text
        .rsplit(' ')
        .next()
        .and_then(parse_token)
        .unwrap_or_else(|| default_for(shape.kind()))
}
