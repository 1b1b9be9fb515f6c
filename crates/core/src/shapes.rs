//! Shape-tree flattening: locate image-bearing leaves of a slide shape tree.

use log::debug;

use crate::extraction::encode_blob;
use crate::model::{Fallible, Fill, ImageData, Relationships, Shape, ShapeKind};
use crate::records::ImageRecord;

/// Image records found in `shape` and its descendants.
///
/// Pictures and picture fills yield their decoded image. Groups are pure
/// containers. Any other shape falls back to the first image relationship
/// its markup embeds, resolved through `rels`.
pub fn shape_images(
    shape: &Shape,
    rels: &Relationships,
    slide: usize,
    skipped: &mut usize,
) -> Vec<ImageRecord> {
    if let ShapeKind::Group(children) = &shape.kind {
        return children
            .iter()
            .flat_map(|child| shape_images(child, rels, slide, skipped))
            .collect();
    }

    let picture = match (&shape.kind, &shape.fill) {
        (ShapeKind::Picture(image), _) => Some(image),
        (_, Fill::Picture(image)) => Some(image),
        _ => None,
    };
    if let Some(image) = picture {
        return decoded_image(shape, image, slide, skipped)
            .into_iter()
            .collect();
    }

    embedded_image(shape, rels, slide).into_iter().collect()
}

fn decoded_image(
    shape: &Shape,
    image: &Fallible<ImageData>,
    slide: usize,
    skipped: &mut usize,
) -> Option<ImageRecord> {
    match image {
        Ok(image) => Some(ImageRecord::Shape {
            slide,
            image_id: shape.id,
            blob: encode_blob(image.blob()),
            format: image.ext().unwrap_or_else(|| "unknown".to_string()),
            width: image.width,
            height: image.height,
        }),
        Err(broken) => {
            debug!("skipping picture {:?} on slide {}: {}", shape.id, slide, broken);
            *skipped += 1;
            None
        }
    }
}

fn embedded_image(shape: &Shape, rels: &Relationships, slide: usize) -> Option<ImageRecord> {
    let embed = shape.blip_embed.as_deref()?;
    let part = rels.related_part(embed)?;
    Some(ImageRecord::Shape {
        slide,
        image_id: shape.id,
        blob: encode_blob(&part.blob),
        format: part.ext().unwrap_or_else(|| "unknown".to_string()),
        width: None,
        height: None,
    })
}
