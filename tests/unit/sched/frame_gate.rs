use super::*;
use std::time::Duration;

struct DroppingFrames;

impl FrameScheduler for DroppingFrames {
    fn request_frame(&mut self, callback: FrameCallback) -> GophersResult<()> {
        drop(callback);
        Ok(())
    }
}

/// Fires each callback from a freshly spawned thread, like a host event loop would.
struct ThreadedFrames {
    next: u64,
}

impl FrameScheduler for ThreadedFrames {
    fn request_frame(&mut self, callback: FrameCallback) -> GophersResult<()> {
        let idx = FrameIndex(self.next);
        self.next += 1;
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            callback(idx);
        });
        Ok(())
    }
}

#[test]
fn immediate_gate_counts_frames() {
    let mut gate = FrameGate::immediate();
    assert_eq!(gate.last_frame(), None);
    for i in 0..5 {
        assert_eq!(gate.wait().unwrap(), FrameIndex(i));
    }
    assert_eq!(gate.last_frame(), Some(FrameIndex(4)));
}

#[test]
fn wait_blocks_until_callback_fires_on_another_thread() {
    let mut gate = FrameGate::new(Box::new(ThreadedFrames { next: 10 }));
    let t0 = Instant::now();
    assert_eq!(gate.wait().unwrap(), FrameIndex(10));
    assert!(t0.elapsed() >= Duration::from_millis(5));
    assert_eq!(gate.wait().unwrap(), FrameIndex(11));
}

#[test]
fn dropped_callback_reports_closed() {
    let mut gate = FrameGate::new(Box::new(DroppingFrames));
    assert!(gate.wait().unwrap_err().is_closed());
}

#[test]
fn paced_gate_respects_frame_period() {
    let fps = Fps::new(100, 1).unwrap();
    let mut gate = FrameGate::paced(fps).unwrap();
    let t0 = Instant::now();
    let mut last = None;
    for _ in 0..6 {
        let idx = gate.wait().unwrap();
        if let Some(prev) = last {
            assert!(idx > prev);
        }
        last = Some(idx);
    }
    // Frames 0..=5 at 10ms apart: the sixth fires no earlier than 50ms after start.
    assert!(t0.elapsed() >= Duration::from_millis(45));
}
