//! Blocking wait for the next repaint.

use std::{
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
    time::Instant,
};

use crate::foundation::{
    core::{Fps, FrameIndex},
    error::{GophersError, GophersResult},
};

/// Callback fired by a [`FrameScheduler`] at the next repaint.
pub type FrameCallback = Box<dyn FnOnce(FrameIndex) + Send + 'static>;

/// The "request animation frame" primitive of a display host.
pub trait FrameScheduler: Send {
    /// Arrange for `callback` to be invoked once, at the next repaint.
    fn request_frame(&mut self, callback: FrameCallback) -> GophersResult<()>;
}

/// Fires every request synchronously, with consecutive frame indices.
///
/// Used for headless runs where frames are produced as fast as they can be drawn.
#[derive(Debug, Default)]
pub struct ImmediateFrames {
    next: FrameIndex,
}

impl ImmediateFrames {
    /// Start numbering at frame 0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ImmediateFrames {
    fn request_frame(&mut self, callback: FrameCallback) -> GophersResult<()> {
        let idx = self.next;
        self.next = idx.next();
        callback(idx);
        Ok(())
    }
}

/// Fires requests from a timer thread at a fixed frame rate.
///
/// Deadlines are measured from the start of the timer, so a slow consumer drops frame indices
/// instead of drifting.
pub struct PacedFrames {
    requests: Option<Sender<FrameCallback>>,
    timer: Option<JoinHandle<()>>,
}

impl PacedFrames {
    /// Start the timer thread.
    pub fn new(fps: Fps) -> GophersResult<Self> {
        let (tx, rx) = mpsc::channel::<FrameCallback>();
        let timer = thread::Builder::new()
            .name("frame-timer".to_string())
            .spawn(move || {
                let start = Instant::now();
                let period = fps.frame_duration();
                let mut idx = 0u64;
                for callback in rx {
                    let deadline = start + fps.frames_to_duration(idx);
                    let now = Instant::now();
                    if deadline > now {
                        thread::sleep(deadline - now);
                    } else if !period.is_zero() {
                        let behind = (now - start).as_nanos() / period.as_nanos().max(1);
                        idx = idx.max(behind as u64);
                    }
                    callback(FrameIndex(idx));
                    idx += 1;
                }
            })
            .map_err(|e| GophersError::schedule(format!("spawn frame timer: {e}")))?;

        Ok(Self {
            requests: Some(tx),
            timer: Some(timer),
        })
    }
}

impl FrameScheduler for PacedFrames {
    fn request_frame(&mut self, callback: FrameCallback) -> GophersResult<()> {
        let requests = self
            .requests
            .as_ref()
            .ok_or_else(|| GophersError::closed("frame timer stopped"))?;
        requests
            .send(callback)
            .map_err(|_| GophersError::closed("frame timer stopped"))
    }
}

impl Drop for PacedFrames {
    fn drop(&mut self) {
        // Dropping the sender ends the timer loop.
        self.requests.take();
        if let Some(timer) = self.timer.take() {
            let _ = timer.join();
        }
    }
}

/// Turns a callback-based [`FrameScheduler`] into a blocking wait.
///
/// [`FrameGate::wait`] requests a frame, then blocks on a one-slot signal channel until the
/// scheduler's callback fires. A scheduler that drops the callback unfired wakes the waiter with
/// a closed error instead of hanging it.
pub struct FrameGate {
    scheduler: Box<dyn FrameScheduler>,
    last: Option<FrameIndex>,
}

impl FrameGate {
    /// Gate over `scheduler`.
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            last: None,
        }
    }

    /// Gate that never sleeps.
    pub fn immediate() -> Self {
        Self::new(Box::new(ImmediateFrames::new()))
    }

    /// Gate paced at `fps` in wall-clock time.
    pub fn paced(fps: Fps) -> GophersResult<Self> {
        Ok(Self::new(Box::new(PacedFrames::new(fps)?)))
    }

    /// Block until the next repaint and return its index.
    pub fn wait(&mut self) -> GophersResult<FrameIndex> {
        let (signal, fired) = mpsc::sync_channel(1);
        self.scheduler.request_frame(Box::new(move |idx| {
            let _ = signal.send(idx);
        }))?;
        let idx = fired
            .recv()
            .map_err(|_| GophersError::closed("frame callback dropped without firing"))?;
        self.last = Some(idx);
        Ok(idx)
    }

    /// Index returned by the most recent [`FrameGate::wait`].
    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.last
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sched/frame_gate.rs"]
mod tests;
