use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::store::{Bitmap, BitmapKey},
    foundation::error::{GophersError, GophersResult},
};

// Avoid pathological allocations from hostile SVG sizes.
const MAX_DIM: u32 = 4096;

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_image(key: BitmapKey, bytes: &[u8]) -> GophersResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Bitmap {
        key,
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes and rasterize them at their intrinsic size.
pub fn rasterize_svg(key: BitmapKey, bytes: &[u8], opts: &usvg::Options<'_>) -> GophersResult<Bitmap> {
    let tree = usvg::Tree::from_data(bytes, opts).context("parse svg tree")?;
    rasterize_tree(key, &tree)
}

pub(crate) fn rasterize_tree(key: BitmapKey, tree: &usvg::Tree) -> GophersResult<Bitmap> {
    let (width, height, pixels) = rasterize_pixels(tree)?;
    Ok(Bitmap {
        key,
        width,
        height,
        rgba8_premul: Arc::new(pixels),
    })
}

/// Rasterize a parsed tree into premultiplied RGBA8 at its intrinsic size.
pub(crate) fn rasterize_pixels(tree: &usvg::Tree) -> GophersResult<(u32, u32, Vec<u8>)> {
    fn to_px(v: f32) -> GophersResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(GophersError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(GophersError::asset(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| GophersError::asset("failed to allocate svg pixmap"))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    Ok((width, height, pixmap.take()))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
