//! Scene drawing and per-snapshot sprite diffing.

use crate::{
    assets::store::{AssetStatus, AssetStore, BitmapKey},
    foundation::error::GophersResult,
    render::{
        scene::{self, Sprite},
        surface::Surface,
    },
    sim::{actor::ActorId, actor::ActorState, pile::PileId, stage::WorldSnapshot},
};

/// What one call to [`Renderer::sample`] or [`Renderer::draw_scene`] did to the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampleStats {
    /// Bitmaps and text blocks drawn.
    pub draws: u32,
    /// Frames presented.
    pub frames: u32,
}

impl std::ops::AddAssign for SampleStats {
    fn add_assign(&mut self, rhs: Self) {
        self.draws += rhs.draws;
        self.frames += rhs.frames;
    }
}

#[derive(Clone, Copy, Debug)]
struct ActorSprites {
    gopher: Sprite,
    logo: Sprite,
    seen: ActorState,
}

/// Keeps the sprites on screen in step with the simulation.
///
/// Only what changed between two snapshots is redrawn, and every bitmap swap is presented as
/// its own frame, so a viewer sees the logo leave its old row before it lands on the new one.
#[derive(Debug)]
pub struct Renderer {
    assets: AssetStore,
    books: Sprite,
    showing_books: bool,
    actors: [ActorSprites; 2],
}

impl Renderer {
    /// Renderer with every sprite at its starting position.
    pub fn new(assets: AssetStore) -> Self {
        let actor = |id: ActorId| {
            let (x, y) = scene::gopher_base(id);
            ActorSprites {
                gopher: Sprite::new(BitmapKey::Pick, x, y),
                logo: Sprite::new(
                    scene::logo_key(id),
                    scene::logo_x(id),
                    scene::logo_y(ActorState::Picking),
                ),
                seen: ActorState::Picking,
            }
        };
        Self {
            assets,
            books: scene::BOOKS,
            showing_books: false,
            actors: [actor(ActorId::Left), actor(ActorId::Right)],
        }
    }

    /// Current sprite of `actor`'s gopher.
    pub fn gopher(&self, actor: ActorId) -> Sprite {
        self.actors[actor.index()].gopher
    }

    /// Current sprite of `actor`'s code indicator.
    pub fn logo(&self, actor: ActorId) -> Sprite {
        self.actors[actor.index()].logo
    }

    /// Current sprite of the middle pile.
    pub fn books(&self) -> Sprite {
        self.books
    }

    /// Draw the static page and every sprite in its starting pose, then present once.
    ///
    /// Waits for each bitmap to finish loading; bitmaps that failed are skipped.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn draw_scene(&mut self, surface: &mut dyn Surface) -> GophersResult<SampleStats> {
        let mut stats = SampleStats::default();

        for (text, x, y) in [scene::EXPLANATION, scene::CREDITS] {
            surface.draw_text(text, x, y)?;
            stats.draws += 1;
        }

        let mut sprites = vec![scene::FUNCTION, scene::BIG_PILE, scene::OVEN, self.books];
        for a in &self.actors {
            sprites.push(a.logo);
        }
        for a in &self.actors {
            sprites.push(a.gopher);
        }
        for sprite in sprites {
            match self.assets.wait_ready(sprite.key) {
                Ok(bitmap) => {
                    surface.draw_image(&bitmap, sprite.x, sprite.y)?;
                    stats.draws += 1;
                }
                Err(err) => {
                    tracing::warn!(asset = %sprite.key, error = %err, "sprite skipped");
                }
            }
        }

        surface.present()?;
        stats.frames += 1;
        Ok(stats)
    }

    /// Present one frame for `snapshot`, then bring every sprite up to date with it.
    pub fn sample(
        &mut self,
        snapshot: &WorldSnapshot,
        surface: &mut dyn Surface,
    ) -> GophersResult<SampleStats> {
        let mut stats = SampleStats::default();
        surface.present()?;
        stats.frames += 1;

        let loaded = snapshot.pile(PileId::Small).is_some();
        if loaded != self.showing_books {
            let key = if loaded {
                BitmapKey::SmallPile
            } else {
                BitmapKey::EmptyPile
            };
            stats += replace_bitmap(&self.assets, &mut self.books, key, surface)?;
            self.showing_books = loaded;
        }

        for id in ActorId::ALL {
            let pose = snapshot.actor(id);
            let sprites = &mut self.actors[id.index()];

            let row = scene::logo_y(pose.state);
            if sprites.logo.y != row {
                stats += replace_bitmap(&self.assets, &mut sprites.logo, BitmapKey::WhiteThumb, surface)?;
                sprites.logo.y = row;
                stats += replace_bitmap(&self.assets, &mut sprites.logo, scene::logo_key(id), surface)?;
            }

            if sprites.seen != pose.state {
                if scene::erases_on_exit(sprites.seen) {
                    stats += replace_bitmap(&self.assets, &mut sprites.gopher, BitmapKey::White, surface)?;
                }
                tracing::trace!(actor = id.name(), from = %sprites.seen, to = %pose.state, "sprite state");
                sprites.seen = pose.state;
            }

            let (base_x, base_y) = scene::gopher_base(id);
            let x = (f64::from(base_x) + pose.offset.x) as i32;
            let y = (f64::from(base_y) + pose.offset.y) as i32;
            let key = scene::state_bitmap(pose.state);
            if sprites.gopher.x != x || sprites.gopher.y != y || sprites.gopher.key != key {
                sprites.gopher.x = x;
                sprites.gopher.y = y;
                stats += replace_bitmap(&self.assets, &mut sprites.gopher, key, surface)?;
            }
        }

        Ok(stats)
    }
}

/// Swap the bitmap of `sprite`, draw it in place and present the frame.
///
/// A bitmap that is not loaded yet is not drawn, but the frame is still presented.
fn replace_bitmap(
    assets: &AssetStore,
    sprite: &mut Sprite,
    key: BitmapKey,
    surface: &mut dyn Surface,
) -> GophersResult<SampleStats> {
    let mut stats = SampleStats::default();
    sprite.key = key;
    match assets.get(key) {
        Some(bitmap) => {
            surface.draw_image(&bitmap, sprite.x, sprite.y)?;
            stats.draws += 1;
        }
        None => {
            if let AssetStatus::Pending = assets.status(key) {
                tracing::trace!(asset = %key, "bitmap still loading");
            }
        }
    }
    surface.present()?;
    stats.frames += 1;
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
