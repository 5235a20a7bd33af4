//! Drawing surfaces and the frame-budget wrapper.

use crate::{
    assets::{decode, fonts, store::Bitmap, store::BitmapKey},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{Canvas, Fps, Rgba8Premul},
    foundation::error::{GophersError, GophersResult},
    render::blit::{PixelsRef, blit_src_over, unpremultiply},
    sched::frame_gate::FrameGate,
};

/// Pixel size of the text font, also used as line pitch.
pub const TEXT_PX: i32 = 12;

/// A presented frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// A premultiplied frame filled with one colour.
    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let data = px
            .iter()
            .copied()
            .cycle()
            .take(Canvas { width, height }.rgba8_len())
            .collect();
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// The pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Copy of the pixels with straight alpha.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }
}

/// Something the renderer can draw sprites and text onto, one presented frame at a time.
pub trait Surface {
    /// Draw `bitmap` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, bitmap: &Bitmap, x: i32, y: i32) -> GophersResult<()>;

    /// Draw 12px sans-serif text. Lines are split on `\n`; `y` is the first baseline.
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> GophersResult<()>;

    /// Wait for the next repaint and publish what has been drawn so far.
    fn present(&mut self) -> GophersResult<()>;

    /// Number of frames presented since the surface was created.
    fn frames_presented(&self) -> u64;

    /// Flush outputs at the end of a run.
    fn finish(&mut self) -> GophersResult<()> {
        Ok(())
    }
}

/// CPU canvas paced by a [`FrameGate`] and published into a [`FrameSink`].
pub struct RasterSurface {
    canvas: Canvas,
    pixels: Vec<u8>,
    gate: FrameGate,
    sink: Box<dyn FrameSink>,
    presented: u64,
    finished: bool,
}

impl RasterSurface {
    /// Create a white canvas and start the sink.
    pub fn new(
        canvas: Canvas,
        fps: Fps,
        gate: FrameGate,
        mut sink: Box<dyn FrameSink>,
    ) -> GophersResult<Self> {
        canvas.validate()?;
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
        })?;
        let pixels = FrameRGBA::filled(canvas.width, canvas.height, Rgba8Premul::WHITE).data;
        Ok(Self {
            canvas,
            pixels,
            gate,
            sink,
            presented: 0,
            finished: false,
        })
    }

    /// Copy of the current canvas contents.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixels.clone(),
            premultiplied: true,
        }
    }

    fn blit(&mut self, width: u32, height: u32, data: &[u8], x: i32, y: i32) {
        blit_src_over(
            &mut self.pixels,
            self.canvas.width,
            self.canvas.height,
            PixelsRef {
                width,
                height,
                data,
            },
            x,
            y,
        );
    }
}

impl Surface for RasterSurface {
    fn draw_image(&mut self, bitmap: &Bitmap, x: i32, y: i32) -> GophersResult<()> {
        let expected = (bitmap.width as usize) * (bitmap.height as usize) * 4;
        if bitmap.rgba8_premul.len() != expected {
            return Err(GophersError::render(format!(
                "bitmap '{}' has {} bytes, expected {expected}",
                bitmap.key,
                bitmap.rgba8_premul.len()
            )));
        }
        let data = std::sync::Arc::clone(&bitmap.rgba8_premul);
        self.blit(bitmap.width, bitmap.height, &data, x, y);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> GophersResult<()> {
        let Ok(x_px) = u32::try_from(x) else {
            return Err(GophersError::render("text x must be non-negative"));
        };
        let Some(width) = self.canvas.width.checked_sub(x_px).filter(|w| *w > 0) else {
            return Ok(());
        };
        let Some((w, h, data)) = rasterize_text(text, width)? else {
            return Ok(());
        };
        self.blit(w, h, &data, x, y - TEXT_PX);
        Ok(())
    }

    fn present(&mut self) -> GophersResult<()> {
        let idx = self.gate.wait()?;
        let frame = self.snapshot();
        self.sink.push_frame(idx, &frame)?;
        self.presented += 1;
        tracing::trace!(frame = idx.0, presented = self.presented, "frame presented");
        Ok(())
    }

    fn frames_presented(&self) -> u64 {
        self.presented
    }

    fn finish(&mut self) -> GophersResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.sink.end()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the SVG document for a block of text whose first baseline sits at `TEXT_PX`.
pub(crate) fn text_svg(text: &str, width: u32) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let height = TEXT_PX as usize * (lines.len() + 1);
    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text font-family="sans-serif" font-size="{TEXT_PX}" fill="#000000" xml:space="preserve">"##
    );
    for (k, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = TEXT_PX as usize * (k + 1);
        svg.push_str(&format!(
            r#"<tspan x="0" y="{baseline}">{}</tspan>"#,
            escape_xml(line)
        ));
    }
    svg.push_str("</text></svg>");
    svg
}

fn rasterize_text(text: &str, width: u32) -> GophersResult<Option<(u32, u32, Vec<u8>)>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let svg = text_svg(text, width);
    let opts = fonts::svg_options(None);
    let tree = usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| GophersError::render(format!("text layout failed: {e}")))?;
    decode::rasterize_pixels(&tree).map(Some)
}

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    /// `draw_image` of the named bitmap.
    Image {
        /// Bitmap drawn.
        key: BitmapKey,
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
    },
    /// `draw_text`.
    Text {
        /// The text, newlines included.
        text: String,
        /// Left edge.
        x: i32,
        /// First baseline.
        y: i32,
    },
    /// `present`.
    Present,
}

/// Surface that only records what was asked of it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    presented: u64,
}

impl RecordingSurface {
    /// An empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the frame counter alone.
    pub fn drain(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Keys drawn since the start of the recording, in order.
    pub fn images(&self) -> Vec<(BitmapKey, i32, i32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image { key, x, y } => Some((*key, *x, *y)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn draw_image(&mut self, bitmap: &Bitmap, x: i32, y: i32) -> GophersResult<()> {
        self.calls.push(DrawCall::Image {
            key: bitmap.key,
            x,
            y,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> GophersResult<()> {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn present(&mut self) -> GophersResult<()> {
        self.calls.push(DrawCall::Present);
        self.presented += 1;
        Ok(())
    }

    fn frames_presented(&self) -> u64 {
        self.presented
    }
}

/// Forwards to another surface until it has presented `limit` frames, then reports closed.
pub struct FrameLimit<'a> {
    inner: &'a mut dyn Surface,
    limit: u64,
}

impl<'a> FrameLimit<'a> {
    /// Wrap `inner`, counting frames it had already presented.
    pub fn new(inner: &'a mut dyn Surface, limit: u64) -> Self {
        Self { inner, limit }
    }

    /// Whether the next `present` would be refused.
    pub fn exhausted(&self) -> bool {
        self.inner.frames_presented() >= self.limit
    }
}

impl Surface for FrameLimit<'_> {
    fn draw_image(&mut self, bitmap: &Bitmap, x: i32, y: i32) -> GophersResult<()> {
        self.inner.draw_image(bitmap, x, y)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> GophersResult<()> {
        self.inner.draw_text(text, x, y)
    }

    fn present(&mut self) -> GophersResult<()> {
        if self.exhausted() {
            return Err(GophersError::closed(format!(
                "frame limit of {} reached",
                self.limit
            )));
        }
        self.inner.present()
    }

    fn frames_presented(&self) -> u64 {
        self.inner.frames_presented()
    }

    fn finish(&mut self) -> GophersResult<()> {
        self.inner.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
