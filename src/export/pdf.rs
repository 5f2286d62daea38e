//! Single-page PDF assembly.
//!
//! The page's media box is `[0 0 width height]` in canvas pixels (one PDF unit
//! per pixel) and holds exactly one image XObject stretched over the whole
//! page:
//!
//! ```text
//! q  width 0 0 height 0 0 cm  /Im0 Do  Q
//! ```
//!
//! The raster may be larger than the page (oversampled capture); PDF viewers
//! scale it down into the page box.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::Write;

use crate::error::{LaurelError, Result};

/// Resource name of the embedded raster.
const IMAGE_NAME: &str = "Im0";

fn doc_err(e: impl std::fmt::Display) -> LaurelError {
    LaurelError::Document(e.to_string())
}

/// Build a one-page PDF of `page_width` × `page_height` units showing `raster`.
pub fn single_page(raster: &RgbImage, page_width: u32, page_height: u32) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raster.as_raw())?;
    let pixels = encoder.finish()?;

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => raster.width() as i64,
            "Height" => raster.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        pixels,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (page_width as i64).into(),
                    0.into(),
                    0.into(),
                    (page_height as i64).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(doc_err)?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (page_width as i64).into(), (page_height as i64).into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(doc_err)?;
    Ok(buffer)
}
