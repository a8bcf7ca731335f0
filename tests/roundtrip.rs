use enough::{Stop, StopReason, Unstoppable};
use palbmp::*;

/// BGR bytes for a raw palette word, computed straight from the bit layout.
fn expected_bgr(raw: u16) -> [u8; 3] {
    let swapped = ((raw & 0xFF00) >> 8) | ((raw & 0x00FF) << 8);
    [
        ((swapped << 3) & 0xF8) as u8,
        ((swapped >> 3) & 0xFC) as u8,
        ((swapped >> 8) & 0xF8) as u8,
    ]
}

#[test]
fn one_by_one_is_a_single_padded_row() {
    let bitmap = IndexedBitmap::new(1, 1).unwrap();
    let palette = [0xFFFFu16];
    let encoded = encode_indexed_to_vec(&bitmap, &palette, Unstoppable).unwrap();

    assert_eq!(encoded.len(), 54 + 4);
    assert_eq!(&encoded[54..], &[0xF8, 0xFC, 0xF8, 0x00]);
    let info = BmpInfo::from_bytes(&encoded).unwrap();
    assert_eq!(info.file_size as usize, encoded.len());
}

#[test]
fn uniform_16x16_worked_example() {
    let mut bitmap = IndexedBitmap::new(16, 16).unwrap();
    bitmap.fill(3).unwrap();
    let mut palette = vec![0u16; 4];
    palette[3] = 0xF800;

    let encoded = encode_indexed_to_vec(&bitmap, &palette, Unstoppable).unwrap();
    assert_eq!(encoded.len(), 54 + 48 * 16);
    for px in encoded[54..].chunks_exact(3) {
        assert_eq!(px, &[0xC0, 0x1C, 0x00]);
    }
}

#[test]
fn headers_match_bitmapinfoheader_layout() {
    let bitmap = IndexedBitmap::new(5, 3).unwrap();
    let encoded = encode_indexed_to_vec(&bitmap, &[0u16], Unstoppable).unwrap();

    assert_eq!(&encoded[0..2], &[0x42, 0x4D]);
    let info = BmpInfo::from_bytes(&encoded).unwrap();
    assert_eq!(info.file_size, 54 + 16 * 3);
    assert_eq!(info.data_offset, 54);
    assert_eq!(info.header_size, 40);
    assert_eq!(info.width, 5);
    assert_eq!(info.height, 3);
    assert!(info.is_bottom_up());
    assert_eq!(info.planes, 1);
    assert_eq!(info.bits_per_pixel, 24);
    assert_eq!(info.compression, 0);
    assert_eq!(info.image_size, 0);
    assert_eq!(info.colors_used, 0);
    assert_eq!(info.stride(), Some(16));
    assert!(encoded[30..54].iter().all(|&b| b == 0));
}

#[test]
fn decode_reproduces_palette_colors() {
    let w = 7u32;
    let h = 5u32;
    let palette: Vec<u16> = vec![0x0000, 0x00F8, 0xE007, 0x1F00, 0x34A2, 0xFFFF, 0x5AEB];
    let indices: Vec<u8> = (0..w * h).map(|i| ((i * 5 + i / w) % 7) as u8).collect();
    let bitmap = IndexedBitmap::from_indices(w, h, indices).unwrap();

    let encoded = encode_indexed_to_vec(&bitmap, &palette, Unstoppable).unwrap();
    let decoded = decode_rgb24(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.width, w);
    assert_eq!(decoded.height, h);
    for y in 0..h {
        for x in 0..w {
            let [b, g, r] = expected_bgr(palette[bitmap.get(x, y).unwrap() as usize]);
            assert_eq!(decoded.pixel(x, y), Some([r, g, b]), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn encoding_is_deterministic() {
    let mut bitmap = IndexedBitmap::with_value_count(9, 4, 3).unwrap();
    bitmap.set(0, 0, 1).unwrap();
    bitmap.set(8, 3, 2).unwrap();
    let palette = [0x1234u16, 0xABCD, 0x0F0F];

    let a = encode_indexed_to_vec(&bitmap, &palette, Unstoppable).unwrap();
    let b = encode_indexed_to_vec(&bitmap, &palette, Unstoppable).unwrap();
    assert_eq!(a, b);
}

#[test]
fn out_of_range_index_is_an_error() {
    let bitmap = IndexedBitmap::from_indices(2, 2, vec![0, 1, 2, 9]).unwrap();
    let palette = [0u16; 3];
    let err = encode_indexed_to_vec(&bitmap, &palette, Unstoppable).unwrap_err();
    match err {
        BitmapError::IndexOutOfRange {
            x,
            y,
            index,
            palette_len,
        } => {
            assert_eq!((x, y, index, palette_len), (0, 1, 2, 3));
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
}

#[test]
fn caller_sink_is_written_and_left_usable() {
    let bitmap = IndexedBitmap::new(2, 2).unwrap();
    let mut out = b"prefix".to_vec();
    let layout = encode_indexed(&bitmap, &[0xFFFFu16], &mut out, Unstoppable).unwrap();
    assert_eq!(layout.file_size, 54 + 8 * 2);
    assert_eq!(&out[..6], b"prefix");
    assert_eq!(&out[6..8], b"BM");
    out.extend_from_slice(b"suffix");
    assert_eq!(out.len(), 6 + layout.file_size + 6);
}

#[test]
fn slice_sink_gets_exact_file() {
    let bitmap = IndexedBitmap::new(3, 2).unwrap();
    let mut buf = [0xAAu8; 54 + 12 * 2];
    let mut sink = SliceSink::new(&mut buf);
    encode_indexed(&bitmap, &[0u16], &mut sink, Unstoppable).unwrap();
    assert_eq!(sink.written(), buf.len());
    assert!(buf[54..].iter().all(|&b| b == 0));

    let mut small = [0u8; 60];
    let mut sink = SliceSink::new(&mut small);
    assert!(matches!(
        encode_indexed(&bitmap, &[0u16], &mut sink, Unstoppable),
        Err(BitmapError::SinkFull { .. })
    ));
    assert_eq!(sink.written(), 0);
}

struct FailAfter {
    remaining: usize,
    written: usize,
}

impl ByteSink for FailAfter {
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
        if buf.len() > self.remaining {
            return Err(BitmapError::SinkFull {
                needed: buf.len(),
                available: self.remaining,
            });
        }
        self.remaining -= buf.len();
        self.written += buf.len();
        Ok(())
    }
}

#[test]
fn write_failure_stops_the_encode() {
    let bitmap = IndexedBitmap::new(4, 8).unwrap();
    let mut sink = FailAfter {
        remaining: 54 + 12 * 3,
        written: 0,
    };
    let err = encode_indexed(&bitmap, &[0u16], &mut sink, Unstoppable).unwrap_err();
    assert!(matches!(err, BitmapError::SinkFull { needed: 12, .. }));
    assert_eq!(sink.written, 54 + 12 * 3);
}

struct AlreadyCancelled;

impl Stop for AlreadyCancelled {
    fn check(&self) -> Result<(), StopReason> {
        Err(StopReason::Cancelled)
    }
}

#[test]
fn cancellation_writes_nothing() {
    let bitmap = IndexedBitmap::new(4, 4).unwrap();
    let mut out = Vec::new();
    let err = encode_indexed(&bitmap, &[0u16], &mut out, AlreadyCancelled).unwrap_err();
    assert!(matches!(err, BitmapError::Cancelled(_)));
    assert!(out.is_empty());
}

#[test]
fn limits_reject_large() {
    let bitmap = IndexedBitmap::new(10, 10).unwrap();
    let limits = Limits {
        max_pixels: Some(99),
        ..Default::default()
    };
    let result = EncodeRequest::new(&bitmap, &[0u16])
        .with_limits(&limits)
        .encode(Unstoppable);
    match result.unwrap_err() {
        BitmapError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }

    // whole-file allocation counts against the memory limit for Vec output
    let limits = Limits {
        max_memory_bytes: Some(100),
        ..Default::default()
    };
    let request = EncodeRequest::new(&bitmap, &[0u16]).with_limits(&limits);
    assert!(matches!(
        request.encode(Unstoppable),
        Err(BitmapError::LimitExceeded(_))
    ));
    let mut out = Vec::new();
    assert!(request.encode_into(&mut out, Unstoppable).is_ok());
}

#[test]
fn request_layout_matches_output() {
    let bitmap = IndexedBitmap::new(13, 7).unwrap();
    let request = EncodeRequest::new(&bitmap, &[0u16]);
    let layout = request.layout().unwrap();
    assert_eq!(layout.padding, 1);
    assert_eq!(layout.stride, 40);
    assert_eq!(layout.row_bytes(), 39);
    assert_eq!(request.encode(Unstoppable).unwrap().len(), layout.file_size);
}

#[test]
fn save_creates_and_closes_file() {
    let path = std::env::temp_dir().join(format!("palbmp-save-{}.bmp", std::process::id()));
    let bitmap = IndexedBitmap::new(6, 3).unwrap();
    let palette = [SwappedRgb565::from_rgb888(0x00FF00)];

    let layout = save_indexed(&bitmap, &palette, &path, Unstoppable).unwrap();
    let on_disk = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(on_disk.len(), layout.file_size);
    assert_eq!(
        on_disk,
        encode_indexed_to_vec(&bitmap, &palette, Unstoppable).unwrap()
    );
}

#[test]
fn rejected_save_keeps_existing_file() {
    let path = std::env::temp_dir().join(format!("palbmp-keep-{}.bmp", std::process::id()));
    std::fs::write(&path, b"previous good contents").unwrap();

    let bitmap = IndexedBitmap::from_indices(2, 1, vec![0, 7]).unwrap();
    let err = save_indexed(&bitmap, &[0u16; 2], &path, Unstoppable).unwrap_err();
    let contents = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(err, BitmapError::IndexOutOfRange { index: 7, .. }));
    assert_eq!(contents, b"previous good contents");
}

#[test]
fn rejected_save_creates_no_file() {
    let path = std::env::temp_dir().join(format!("palbmp-none-{}.bmp", std::process::id()));
    let bitmap = IndexedBitmap::new(2, 2).unwrap();
    let empty: [u16; 0] = [];

    let err = save_indexed(&bitmap, &empty, &path, Unstoppable).unwrap_err();
    assert!(matches!(err, BitmapError::InvalidInput(_)));
    assert!(!path.exists());

    let limits = Limits {
        max_width: Some(1),
        ..Default::default()
    };
    let err = EncodeRequest::new(&bitmap, &[0u16])
        .with_limits(&limits)
        .save(&path, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, BitmapError::LimitExceeded(_)));
    assert!(!path.exists());
}

#[test]
fn cancelled_save_leaves_path_alone() {
    let fresh = std::env::temp_dir().join(format!("palbmp-cancel-{}.bmp", std::process::id()));
    let bitmap = IndexedBitmap::new(4, 4).unwrap();
    let err = save_indexed(&bitmap, &[0u16], &fresh, AlreadyCancelled).unwrap_err();
    assert!(matches!(err, BitmapError::Cancelled(_)));
    assert!(!fresh.exists());

    let existing =
        std::env::temp_dir().join(format!("palbmp-cancel-old-{}.bmp", std::process::id()));
    std::fs::write(&existing, b"old").unwrap();
    let err = save_indexed(&bitmap, &[0u16], &existing, AlreadyCancelled).unwrap_err();
    let contents = std::fs::read(&existing).unwrap();
    std::fs::remove_file(&existing).unwrap();
    assert!(matches!(err, BitmapError::Cancelled(_)));
    assert_eq!(contents, b"old");
}

#[test]
fn save_to_missing_directory_is_io_error() {
    let path = std::env::temp_dir()
        .join(format!("palbmp-missing-{}", std::process::id()))
        .join("out.bmp");
    let bitmap = IndexedBitmap::new(2, 2).unwrap();
    let err = save_indexed(&bitmap, &[0u16], &path, Unstoppable).unwrap_err();
    assert!(matches!(err, BitmapError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn write_sink_wraps_any_writer() {
    let bitmap = IndexedBitmap::new(2, 1).unwrap();
    let mut sink = WriteSink(std::io::Cursor::new(Vec::new()));
    encode_indexed(&bitmap, &[0u16], &mut sink, Unstoppable).unwrap();
    let bytes = sink.into_inner().into_inner();
    assert_eq!(bytes.len(), 54 + 8);
}

#[test]
fn decode_limits_apply() {
    let bitmap = IndexedBitmap::new(4, 4).unwrap();
    let encoded = encode_indexed_to_vec(&bitmap, &[0u16], Unstoppable).unwrap();
    let limits = Limits {
        max_width: Some(3),
        ..Default::default()
    };
    let result = DecodeRequest::new(&encoded)
        .with_limits(&limits)
        .decode(Unstoppable);
    assert!(matches!(result, Err(BitmapError::LimitExceeded(_))));
    assert_eq!(DecodeRequest::new(&encoded).info().unwrap().width, 4);
}
