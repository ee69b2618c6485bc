use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::{Value, json};
use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// A layout with a single page holding `elements`.
pub fn single_page(elements: Vec<Value>) -> Value {
    json!({ "pages": [ { "id": "page-1", "elements": elements } ] })
}

/// A layout with one page per entry of `pages`.
pub fn pages(pages: Vec<Vec<Value>>) -> Value {
    let pages: Vec<Value> = pages
        .into_iter()
        .enumerate()
        .map(|(i, elements)| json!({ "id": format!("page-{}", i + 1), "elements": elements }))
        .collect();
    json!({ "pages": pages, "canvasWidth": 595, "canvasHeight": 842 })
}

/// A plain text element.
pub fn text(id: &str, x: f32, y: f32, content: &str) -> Value {
    json!({ "id": id, "type": "text", "x": x, "y": y, "text": content })
}

/// A text element with extra style properties merged in.
pub fn styled_text(id: &str, x: f32, y: f32, content: &str, style: Value) -> Value {
    let mut element = text(id, x, y, content);
    if let (Some(target), Some(extra)) = (element.as_object_mut(), style.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    element
}

pub fn table(id: &str, x: f32, y: f32, rows: u32, cols: u32, cells: Vec<Value>) -> Value {
    json!({
        "id": id, "type": "table", "x": x, "y": y,
        "rows": rows, "cols": cols,
        "cellWidth": 100, "cellHeight": 30,
        "cells": cells
    })
}

pub fn cell(row: i64, col: i64, content: &str) -> Value {
    json!({ "row": row, "col": col, "text": content })
}

pub fn image(id: &str, x: f32, y: f32, width: f32, height: f32, src: &str) -> Value {
    json!({ "id": id, "type": "image", "x": x, "y": y, "width": width, "height": height, "src": src })
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).expect("encode test image");
    bytes.into_inner()
}

/// An opaque `w`x`h` PNG as a data URI.
pub fn png_data_uri(w: u32, h: u32) -> String {
    let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 128]));
    let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Png);
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// A half-transparent `w`x`h` PNG as a data URI.
pub fn translucent_png_data_uri(w: u32, h: u32) -> String {
    let img = RgbaImage::from_pixel(w, h, Rgba([200, 10, 10, 128]));
    let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// A `w`x`h` baseline JPEG as a data URI.
pub fn jpeg_data_uri(w: u32, h: u32) -> String {
    let img = RgbImage::from_pixel(w, h, Rgb([20, 120, 220]));
    let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}
