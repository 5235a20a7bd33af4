use super::*;
use crate::encode::sink::SharedSink;
use crate::foundation::core::FrameIndex;

fn raster(width: u32, height: u32) -> (RasterSurface, SharedSink) {
    let sink = SharedSink::new();
    let surface = RasterSurface::new(
        Canvas { width, height },
        Fps { num: 60, den: 1 },
        FrameGate::immediate(),
        Box::new(sink.clone()),
    )
    .unwrap();
    (surface, sink)
}

fn red(key: BitmapKey, w: u32, h: u32) -> Bitmap {
    Bitmap::solid(key, w, h, Rgba8Premul::from_straight_rgba(255, 0, 0, 255))
}

#[test]
fn canvas_starts_white_and_presents_into_the_sink() {
    let (mut surface, sink) = raster(8, 4);
    surface.draw_image(&red(BitmapKey::Logo, 2, 2), 6, 3).unwrap();
    surface.present().unwrap();
    surface.present().unwrap();
    surface.finish().unwrap();
    surface.finish().unwrap();

    assert_eq!(surface.frames_presented(), 2);
    sink.with_frames(|s| {
        assert!(s.ended());
        assert_eq!(s.frames().len(), 2);
        let (idx, frame) = &s.frames()[1];
        assert_eq!(*idx, FrameIndex(1));
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(6, 3), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(7, 3), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(5, 3), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(8, 0), None);
    })
    .unwrap();
}

#[test]
fn later_draws_cover_earlier_ones() {
    let (mut surface, _sink) = raster(4, 4);
    surface.draw_image(&red(BitmapKey::Pick, 4, 4), 0, 0).unwrap();
    let white = Bitmap::solid(BitmapKey::White, 2, 2, Rgba8Premul::WHITE);
    surface.draw_image(&white, 1, 1).unwrap();
    let snap = surface.snapshot();
    assert_eq!(snap.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(snap.pixel(2, 2), Some([255, 255, 255, 255]));
}

#[test]
fn malformed_bitmap_is_a_render_error() {
    let (mut surface, _sink) = raster(4, 4);
    let bad = Bitmap {
        key: BitmapKey::Oven,
        width: 3,
        height: 3,
        rgba8_premul: std::sync::Arc::new(vec![0; 4]),
    };
    assert!(matches!(
        surface.draw_image(&bad, 0, 0),
        Err(GophersError::Render(_))
    ));
}

#[test]
fn text_document_puts_one_baseline_per_line() {
    let svg = text_svg("a<b\n\nc", 100);
    assert!(svg.contains(r#"height="48""#));
    assert!(svg.contains(r#"<tspan x="0" y="12">a&lt;b</tspan>"#));
    assert!(svg.contains(r#"<tspan x="0" y="36">c</tspan>"#));
    assert!(!svg.contains(r#"y="24""#));
    assert!(svg.contains(r#"font-size="12""#));
}

#[test]
fn text_outside_the_canvas_is_ignored() {
    let (mut surface, _sink) = raster(20, 20);
    surface.draw_text("hello", 30, 12).unwrap();
    surface.draw_text("   ", 0, 12).unwrap();
    assert!(surface.draw_text("x", -1, 12).is_err());
    assert!(surface.draw_text("hello\nworld", 0, 12).is_ok());
}

#[test]
fn recording_surface_keeps_call_order() {
    let mut rec = RecordingSurface::new();
    rec.draw_text("hi", 1, 2).unwrap();
    rec.draw_image(&red(BitmapKey::Oven, 1, 1), 3, 4).unwrap();
    rec.present().unwrap();

    assert_eq!(rec.frames_presented(), 1);
    assert_eq!(rec.images(), vec![(BitmapKey::Oven, 3, 4)]);
    assert_eq!(
        rec.drain(),
        vec![
            DrawCall::Text {
                text: "hi".to_string(),
                x: 1,
                y: 2
            },
            DrawCall::Image {
                key: BitmapKey::Oven,
                x: 3,
                y: 4
            },
            DrawCall::Present,
        ]
    );
    assert!(rec.calls().is_empty());
    assert_eq!(rec.frames_presented(), 1);
}

#[test]
fn frame_limit_refuses_presents_past_the_budget() {
    let mut rec = RecordingSurface::new();
    rec.present().unwrap();
    {
        let mut limited = FrameLimit::new(&mut rec, 3);
        limited.present().unwrap();
        limited.present().unwrap();
        assert!(limited.exhausted());
        let err = limited.present().unwrap_err();
        assert!(err.is_closed());
    }
    assert_eq!(rec.frames_presented(), 3);
}
