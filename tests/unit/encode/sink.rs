use super::*;
use crate::foundation::core::Rgba8Premul;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps { num: 60, den: 1 },
    }
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = FrameRGBA::filled(2, 2, Rgba8Premul::WHITE);
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(3), &frame).unwrap();
    sink.end().unwrap();

    assert!(sink.ended());
    assert_eq!(sink.config(), Some(cfg()));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 3]);
}

#[test]
fn wrong_sized_frame_is_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = FrameRGBA::filled(3, 2, Rgba8Premul::WHITE);
    let err = sink.push_frame(FrameIndex(0), &frame).unwrap_err();
    assert!(err.to_string().contains("size mismatch"));
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = InMemorySink::new();
    let frame = FrameRGBA::filled(2, 2, Rgba8Premul::WHITE);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}

#[test]
fn shared_sink_is_visible_through_clones() {
    let shared = SharedSink::new();
    let mut writer: Box<dyn FrameSink> = Box::new(shared.clone());
    writer.begin(cfg()).unwrap();
    writer
        .push_frame(FrameIndex(1), &FrameRGBA::filled(2, 2, Rgba8Premul::WHITE))
        .unwrap();
    writer.end().unwrap();

    let (count, ended) = shared
        .with_frames(|s| (s.frames().len(), s.ended()))
        .unwrap();
    assert_eq!(count, 1);
    assert!(ended);
}
