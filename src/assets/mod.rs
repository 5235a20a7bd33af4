pub(crate) mod builtin;
/// Image decoding and SVG rasterization.
pub mod decode;
pub(crate) mod fonts;
/// Named bitmaps loaded in the background.
pub mod store;
