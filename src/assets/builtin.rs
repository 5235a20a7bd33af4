use crate::assets::store::BitmapKey;

/// SVG source of the artwork shipped with the crate.
pub(crate) fn builtin_svg(key: BitmapKey) -> &'static str {
    match key {
        BitmapKey::BigPile => include_str!("../../assets/bigpile.svg"),
        BitmapKey::Oven => include_str!("../../assets/oven.svg"),
        BitmapKey::EmptyPile => include_str!("../../assets/emptypile.svg"),
        BitmapKey::SmallPile => include_str!("../../assets/smallpile.svg"),
        BitmapKey::Function => include_str!("../../assets/function.svg"),
        BitmapKey::Pick => include_str!("../../assets/pick.svg"),
        BitmapKey::Full => include_str!("../../assets/full.svg"),
        BitmapKey::Shovel => include_str!("../../assets/shovel.svg"),
        BitmapKey::Empty => include_str!("../../assets/empty.svg"),
        BitmapKey::White => include_str!("../../assets/white.svg"),
        BitmapKey::WhiteThumb => include_str!("../../assets/whitethumb.svg"),
        BitmapKey::Logo => include_str!("../../assets/gophercolor16x16.svg"),
        BitmapKey::LogoFlipped => include_str!("../../assets/gophercolor16x16flipped.svg"),
    }
}
