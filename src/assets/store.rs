//! Named bitmaps, loaded in the background and waited on before first use.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Condvar, Mutex},
};

use anyhow::Context;

use crate::{
    assets::{builtin, decode, fonts},
    foundation::core::Rgba8Premul,
    foundation::error::{GophersError, GophersResult},
};

/// The fixed set of bitmaps the show draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum BitmapKey {
    /// The big pile of books on the far left.
    BigPile,
    /// The oven on the far right.
    Oven,
    /// Middle pile, nothing on it.
    EmptyPile,
    /// Middle pile with books waiting.
    SmallPile,
    /// The code listing both gophers run.
    Function,
    /// Gopher loading its cart.
    Pick,
    /// Gopher pushing a full cart.
    Full,
    /// Gopher shovelling the load off.
    Shovel,
    /// Gopher pulling an empty cart back.
    Empty,
    /// Blank the size of a gopher, used to erase one.
    White,
    /// Blank the size of a logo.
    WhiteThumb,
    /// Left-hand code indicator.
    Logo,
    /// Right-hand code indicator.
    LogoFlipped,
}

impl BitmapKey {
    /// Every key, in load order.
    pub const ALL: [BitmapKey; 13] = [
        BitmapKey::BigPile,
        BitmapKey::Oven,
        BitmapKey::EmptyPile,
        BitmapKey::SmallPile,
        BitmapKey::Function,
        BitmapKey::Pick,
        BitmapKey::Full,
        BitmapKey::Shovel,
        BitmapKey::Empty,
        BitmapKey::White,
        BitmapKey::WhiteThumb,
        BitmapKey::Logo,
        BitmapKey::LogoFlipped,
    ];

    /// File name without extension, as looked up in an asset directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            BitmapKey::BigPile => "bigpile",
            BitmapKey::Oven => "oven",
            BitmapKey::EmptyPile => "emptypile",
            BitmapKey::SmallPile => "smallpile",
            BitmapKey::Function => "function",
            BitmapKey::Pick => "pick",
            BitmapKey::Full => "full",
            BitmapKey::Shovel => "shovel",
            BitmapKey::Empty => "empty",
            BitmapKey::White => "white",
            BitmapKey::WhiteThumb => "whitethumb",
            BitmapKey::Logo => "gophercolor16x16",
            BitmapKey::LogoFlipped => "gophercolor16x16flipped",
        }
    }
}

impl fmt::Display for BitmapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Premultiplied RGBA8 pixels tagged with the key they were loaded for.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    /// Which asset this is.
    pub key: BitmapKey,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// A bitmap filled with one colour.
    pub fn solid(key: BitmapKey, width: u32, height: u32, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&px);
        }
        Self {
            key,
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }
}

/// Where bitmaps come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// Artwork compiled into the crate.
    Builtin,
    /// A directory holding `<stem>.png` or `<stem>.svg` for every [`BitmapKey`].
    Dir(PathBuf),
}

/// Load state of one bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    /// Still loading.
    Pending,
    /// Decoded and ready to draw.
    Ready,
    /// Could not be loaded; the reason was also logged.
    Failed(String),
}

#[derive(Debug)]
enum SlotState {
    Pending,
    Ready(Arc<Bitmap>),
    Failed(String),
}

#[derive(Debug)]
struct AssetSlot {
    state: Mutex<SlotState>,
    settled: Condvar,
}

impl AssetSlot {
    fn new(state: SlotState) -> Self {
        Self {
            state: Mutex::new(state),
            settled: Condvar::new(),
        }
    }

    fn settle(&self, key: BitmapKey, result: GophersResult<Bitmap>) {
        let next = match result {
            Ok(bitmap) => {
                tracing::debug!(asset = %key, width = bitmap.width, height = bitmap.height, "asset ready");
                SlotState::Ready(Arc::new(bitmap))
            }
            Err(err) => {
                tracing::warn!(asset = %key, error = %err, "asset failed to load");
                SlotState::Failed(err.to_string())
            }
        };
        if let Ok(mut guard) = self.state.lock() {
            *guard = next;
        }
        self.settled.notify_all();
    }
}

/// Shared handle to the show's bitmaps. Cloning is cheap.
///
/// Loading never blocks the caller: [`AssetStore::load`] returns immediately while every bitmap
/// is decoded on the rayon pool. Drawing code either peeks with [`AssetStore::get`] (a bitmap that
/// is not ready yet is simply not drawn) or waits with [`AssetStore::wait_ready`].
#[derive(Clone, Debug)]
pub struct AssetStore {
    slots: Arc<HashMap<BitmapKey, AssetSlot>>,
}

impl AssetStore {
    /// Start loading every bitmap from `source` in the background.
    pub fn load(source: AssetSource) -> Self {
        let slots: HashMap<BitmapKey, AssetSlot> = BitmapKey::ALL
            .iter()
            .map(|k| (*k, AssetSlot::new(SlotState::Pending)))
            .collect();
        let store = Self {
            slots: Arc::new(slots),
        };

        for key in BitmapKey::ALL {
            let slots = Arc::clone(&store.slots);
            let source = source.clone();
            rayon::spawn(move || {
                let result = load_one(&source, key);
                if let Some(slot) = slots.get(&key) {
                    slot.settle(key, result);
                }
            });
        }
        store
    }

    /// A store whose bitmaps are already decoded; missing keys are marked failed.
    pub fn preloaded(bitmaps: impl IntoIterator<Item = Bitmap>) -> Self {
        let mut slots: HashMap<BitmapKey, AssetSlot> = bitmaps
            .into_iter()
            .map(|b| (b.key, AssetSlot::new(SlotState::Ready(Arc::new(b)))))
            .collect();
        for key in BitmapKey::ALL {
            slots
                .entry(key)
                .or_insert_with(|| AssetSlot::new(SlotState::Failed("not provided".to_string())));
        }
        Self {
            slots: Arc::new(slots),
        }
    }

    /// Current load state of `key`.
    pub fn status(&self, key: BitmapKey) -> AssetStatus {
        let Some(slot) = self.slots.get(&key) else {
            return AssetStatus::Failed("unknown asset".to_string());
        };
        match slot.state.lock() {
            Ok(guard) => match &*guard {
                SlotState::Pending => AssetStatus::Pending,
                SlotState::Ready(_) => AssetStatus::Ready,
                SlotState::Failed(reason) => AssetStatus::Failed(reason.clone()),
            },
            Err(_) => AssetStatus::Failed("asset slot poisoned".to_string()),
        }
    }

    /// The bitmap for `key` if it is ready, without waiting.
    pub fn get(&self, key: BitmapKey) -> Option<Arc<Bitmap>> {
        let slot = self.slots.get(&key)?;
        let guard = slot.state.lock().ok()?;
        match &*guard {
            SlotState::Ready(bitmap) => Some(Arc::clone(bitmap)),
            SlotState::Pending | SlotState::Failed(_) => None,
        }
    }

    /// Block until `key` has finished loading.
    pub fn wait_ready(&self, key: BitmapKey) -> GophersResult<Arc<Bitmap>> {
        let slot = self
            .slots
            .get(&key)
            .ok_or_else(|| GophersError::asset(format!("unknown asset '{key}'")))?;
        let mut guard = slot
            .state
            .lock()
            .map_err(|_| GophersError::asset("asset slot poisoned"))?;
        loop {
            match &*guard {
                SlotState::Ready(bitmap) => return Ok(Arc::clone(bitmap)),
                SlotState::Failed(reason) => {
                    return Err(GophersError::asset(format!("'{key}': {reason}")));
                }
                SlotState::Pending => {
                    guard = slot
                        .settled
                        .wait(guard)
                        .map_err(|_| GophersError::asset("asset condvar wait failed"))?;
                }
            }
        }
    }

    /// Wait for every bitmap and report the keys that failed.
    pub fn wait_all(&self) -> Vec<(BitmapKey, String)> {
        let mut failed = Vec::new();
        for key in BitmapKey::ALL {
            if let Err(err) = self.wait_ready(key) {
                failed.push((key, err.to_string()));
            }
        }
        failed
    }
}

fn load_one(source: &AssetSource, key: BitmapKey) -> GophersResult<Bitmap> {
    match source {
        AssetSource::Builtin => {
            let opts = fonts::svg_options(None);
            decode::rasterize_svg(key, builtin::builtin_svg(key).as_bytes(), &opts)
        }
        AssetSource::Dir(dir) => load_from_dir(dir, key),
    }
}

fn load_from_dir(dir: &Path, key: BitmapKey) -> GophersResult<Bitmap> {
    let png = dir.join(format!("{}.png", key.file_stem()));
    if png.is_file() {
        let bytes = std::fs::read(&png)
            .with_context(|| format!("read asset bytes from '{}'", png.display()))?;
        return decode::decode_image(key, &bytes);
    }

    let svg = dir.join(format!("{}.svg", key.file_stem()));
    if svg.is_file() {
        let bytes = std::fs::read(&svg)
            .with_context(|| format!("read asset bytes from '{}'", svg.display()))?;
        let opts = fonts::svg_options(Some(dir.to_path_buf()));
        return decode::rasterize_svg(key, &bytes, &opts);
    }

    Err(GophersError::asset(format!(
        "no {stem}.png or {stem}.svg in '{}'",
        dir.display(),
        stem = key.file_stem()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
