use super::*;

fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba.to_vec()).unwrap();
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn png_is_decoded_and_premultiplied() {
    let bytes = encode_png(2, 1, &[255, 0, 0, 255, 200, 100, 50, 128]);
    let bmp = decode_image(BitmapKey::Logo, &bytes).unwrap();
    assert_eq!(bmp.key, BitmapKey::Logo);
    assert_eq!((bmp.width, bmp.height), (2, 1));
    assert_eq!(&bmp.rgba8_premul[0..4], &[255, 0, 0, 255]);
    assert_eq!(&bmp.rgba8_premul[4..8], &[100, 50, 25, 128]);
}

#[test]
fn fully_transparent_pixels_lose_colour() {
    let bytes = encode_png(1, 1, &[9, 9, 9, 0]);
    let bmp = decode_image(BitmapKey::White, &bytes).unwrap();
    assert_eq!(bmp.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn garbage_bytes_are_an_error() {
    assert!(decode_image(BitmapKey::Oven, b"not an image").is_err());
}

#[test]
fn svg_rasterizes_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="3">
        <rect width="4" height="3" fill="#00ff00"/>
    </svg>"##;
    let bmp = rasterize_svg(BitmapKey::Pick, svg, &usvg::Options::default()).unwrap();
    assert_eq!((bmp.width, bmp.height), (4, 3));
    assert_eq!(bmp.rgba8_premul.len(), 4 * 3 * 4);
    assert_eq!(&bmp.rgba8_premul[0..4], &[0, 255, 0, 255]);
}

#[test]
fn oversized_svg_is_rejected() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="5000" height="10"></svg>"#;
    let err = rasterize_svg(BitmapKey::Function, svg, &usvg::Options::default()).unwrap_err();
    assert!(err.to_string().contains("too large"));
}
