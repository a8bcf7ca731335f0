#![no_main]
use libfuzzer_sys::fuzz_target;
use palbmp::*;

fuzz_target!(|data: &[u8]| {
    // Layout: width, height, palette length, palette words (LE), then indices
    let [w, h, n, rest @ ..] = data else {
        return;
    };
    let (w, h, n) = (u32::from(*w % 64) + 1, u32::from(*h % 64) + 1, usize::from(*n) + 1);
    let Some((pal_bytes, idx_bytes)) = rest.split_at_checked(n * 2) else {
        return;
    };
    let palette: Vec<u16> = pal_bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let count = (w * h) as usize;
    if idx_bytes.len() < count {
        return;
    }
    let Ok(bitmap) = IndexedBitmap::from_indices(w, h, idx_bytes[..count].to_vec()) else {
        return;
    };

    let encoded = match encode_indexed_to_vec(&bitmap, &palette, enough::Unstoppable) {
        Ok(encoded) => encoded,
        Err(BitmapError::IndexOutOfRange { index, .. }) => {
            assert!(index >= palette.len());
            return;
        }
        Err(e) => panic!("unexpected encode error: {e}"),
    };

    let stride = (3 * w as usize).div_ceil(4) * 4;
    assert_eq!(encoded.len(), 54 + stride * h as usize);

    let decoded = decode_rgb24(&encoded, enough::Unstoppable).expect("encoded BMP must decode");
    for y in 0..h {
        for x in 0..w {
            let raw = palette[usize::from(bitmap.get(x, y).unwrap())];
            let [b, g, r] = SwappedRgb565::from_raw(raw).to_bgr();
            assert_eq!(decoded.pixel(x, y), Some([r, g, b]), "roundtrip pixel mismatch");
        }
    }
});
