//! Show lifecycle: the simulation worker thread and the presenter loop that samples it.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crate::{
    assets::store::AssetStore,
    foundation::error::{GophersError, GophersResult},
    render::{
        renderer::{Renderer, SampleStats},
        surface::{FrameLimit, Surface},
    },
    sched::rendezvous::Rendezvous,
    show::config::ShowConfig,
    sim::{
        actor::{ActorId, ActorState},
        load::Load,
        stage::{Stage, StageConfig, StageStats, WorldSnapshot},
    },
};

/// Entry point for starting the simulation worker.
pub struct Show;

impl Show {
    /// Spawn the simulation worker. It hands every snapshot over through a rendezvous, so it
    /// only advances as fast as [`RunningShow::next_snapshot`] is called.
    pub fn start(config: &StageConfig) -> GophersResult<RunningShow> {
        let mut stage = Stage::new(config)?;
        let channel = Arc::new(Rendezvous::new());
        let tx = Arc::clone(&channel);

        let worker = thread::Builder::new()
            .name("gophers-sim".to_string())
            .spawn(move || {
                tracing::debug!("simulation worker started");
                let result = drive(&mut stage, &tx);
                tx.close();
                tracing::debug!(steps = stage.stats().steps, "simulation worker stopped");
                result.map(|()| stage.stats())
            })
            .map_err(|e| GophersError::schedule(format!("failed to spawn simulation worker: {e}")))?;

        Ok(RunningShow {
            channel,
            worker: Some(worker),
        })
    }
}

fn drive(stage: &mut Stage, tx: &Rendezvous<WorldSnapshot>) -> GophersResult<()> {
    loop {
        let snapshot = stage.step()?;
        match tx.send(snapshot) {
            Ok(()) => {}
            Err(err) if err.is_closed() => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

/// Handle to a started show. Dropping it stops the worker.
pub struct RunningShow {
    channel: Arc<Rendezvous<WorldSnapshot>>,
    worker: Option<JoinHandle<GophersResult<StageStats>>>,
}

impl RunningShow {
    /// Block until the worker publishes its next step.
    pub fn next_snapshot(&self) -> GophersResult<WorldSnapshot> {
        self.channel.recv()
    }

    /// Stop the worker and return its counters.
    ///
    /// A worker that died on its own (a stalled run queue) reports that error here.
    pub fn stop(mut self) -> GophersResult<StageStats> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> GophersResult<StageStats> {
        self.channel.close();
        let Some(worker) = self.worker.take() else {
            return Err(GophersError::schedule("show already stopped"));
        };
        worker
            .join()
            .map_err(|_| GophersError::schedule("simulation worker panicked"))?
    }
}

impl Drop for RunningShow {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.shutdown();
        }
    }
}

/// Totals of one call to [`play`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PlayReport {
    /// Frames presented, scene included.
    pub frames: u64,
    /// Snapshots rendered.
    pub samples: u64,
    /// Bitmaps and text blocks drawn.
    pub draws: u64,
    /// Simulation counters when the show stopped.
    pub stage: StageStats,
}

/// Draw the scene, then sample snapshots onto `surface` until `config.max_frames` frames have
/// been presented.
#[tracing::instrument(skip_all, fields(max_frames = config.max_frames, seed = config.sim.seed))]
pub fn play(
    config: &ShowConfig,
    surface: &mut dyn Surface,
    assets: AssetStore,
) -> GophersResult<PlayReport> {
    config.validate()?;
    let mut renderer = Renderer::new(assets);
    let mut limited = FrameLimit::new(surface, config.max_frames);
    let show = Show::start(&config.sim)?;

    let mut report = PlayReport::default();
    let outcome = present(&mut renderer, &show, &mut limited, &mut report);
    let stage = show.stop();

    let outcome = match outcome {
        Err(err) if err.is_closed() => Ok(()),
        other => other,
    };
    if let Err(err) = outcome.and_then(|()| stage.map(|stats| report.stage = stats)) {
        if let Err(finish_err) = limited.finish() {
            tracing::warn!(error = %finish_err, "surface did not finish cleanly");
        }
        return Err(err);
    }
    report.frames = limited.frames_presented();
    limited.finish()?;

    tracing::info!(
        frames = report.frames,
        samples = report.samples,
        draws = report.draws,
        steps = report.stage.steps,
        burned = report.stage.burned,
        "show finished"
    );
    Ok(report)
}

fn present(
    renderer: &mut Renderer,
    show: &RunningShow,
    surface: &mut FrameLimit<'_>,
    report: &mut PlayReport,
) -> GophersResult<()> {
    let scene: SampleStats = renderer.draw_scene(surface)?;
    report.draws += u64::from(scene.draws);
    loop {
        if surface.exhausted() {
            return Ok(());
        }
        let snapshot = show.next_snapshot()?;
        let stats = renderer.sample(&snapshot, surface)?;
        report.draws += u64::from(stats.draws);
        report.samples += 1;
    }
}

/// One actor changing state during a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Transition {
    /// Step at which the new state was first observed.
    pub step: u64,
    /// Actor that changed.
    pub actor: ActorId,
    /// Previous state.
    pub from: ActorState,
    /// New state.
    pub to: ActorState,
    /// Load on the cart after the change.
    pub cart: Option<Load>,
}

/// Run the simulation alone for `steps` steps and list every actor state change.
#[tracing::instrument(skip(config), fields(seed = config.seed))]
pub fn trace(config: &StageConfig, steps: u64) -> GophersResult<(Vec<Transition>, StageStats)> {
    let mut stage = Stage::new(config)?;
    let mut seen = [ActorState::Picking; 2];
    let mut out = Vec::new();
    for _ in 0..steps {
        let snapshot = stage.step()?;
        for id in ActorId::ALL {
            let pose = snapshot.actor(id);
            let prev = &mut seen[id.index()];
            if *prev != pose.state {
                out.push(Transition {
                    step: snapshot.step,
                    actor: id,
                    from: *prev,
                    to: pose.state,
                    cart: pose.cart,
                });
                *prev = pose.state;
            }
        }
    }
    Ok((out, stage.stats()))
}

#[cfg(test)]
#[path = "../../tests/unit/show/runner.rs"]
mod tests;
