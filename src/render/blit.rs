//! Premultiplied source-over compositing of a bitmap onto a frame buffer.

use crate::foundation::math::mul_div255_u16;

/// A tightly packed premultiplied RGBA8 image borrowed for blitting.
#[derive(Clone, Copy, Debug)]
pub struct PixelsRef<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: &'a [u8],
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Parts of `src` falling outside `dst` are clipped. Returns the number of pixels written.
pub fn blit_src_over(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: PixelsRef<'_>,
    x: i32,
    y: i32,
) -> usize {
    let (dw, dh) = (i64::from(dst_width), i64::from(dst_height));
    let (sw, sh) = (i64::from(src.width), i64::from(src.height));
    if src.data.len() < (sw * sh * 4) as usize || dst.len() < (dw * dh * 4) as usize {
        return 0;
    }

    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + sw).min(dw);
    let y1 = (i64::from(y) + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return 0;
    }

    let mut written = 0usize;
    for dy in y0..y1 {
        let sy = dy - i64::from(y);
        for dx in x0..x1 {
            let sx = dx - i64::from(x);
            let si = ((sy * sw + sx) * 4) as usize;
            let di = ((dy * dw + dx) * 4) as usize;
            let s = &src.data[si..si + 4];
            let d = &mut dst[di..di + 4];
            let sa = u16::from(s[3]);
            match sa {
                0 => continue,
                255 => d.copy_from_slice(s),
                _ => {
                    let inv = 255 - sa;
                    for c in 0..4 {
                        let v = u16::from(s[c]) + mul_div255_u16(u16::from(d[c]), inv);
                        d[c] = v.min(255) as u8;
                    }
                }
            }
            written += 1;
        }
    }
    written
}

/// Undo premultiplication of one pixel.
pub fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/render/blit.rs"]
mod tests;
