use pixelizator_wasm::{
    Bitmap, Color, MemoryStore, Palette, PersistentPalette, PixelateOptions, Sizing, pixelate,
    pixelate_bytes, pixelate_with,
};
use proptest::prelude::*;

fn checkerboard(width: u32, height: u32) -> Bitmap {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let px = if (x + y) % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] };
            data.extend_from_slice(&px);
        }
    }
    Bitmap::from_rgba(width, height, data).unwrap()
}

#[test]
fn png_in_png_out_keeps_dimensions() {
    let png = checkerboard(12, 7).encode_png().unwrap();
    let options = PixelateOptions {
        sizing: Sizing::from_count(3),
    };
    let (out_png, grid) = pixelate_bytes(&png, &options, &Palette::new()).unwrap();
    assert_eq!((grid.block_size, grid.count_x, grid.count_y), (4, 3, 1));

    let out = Bitmap::decode(&out_png).unwrap();
    assert_eq!(out.dimensions(), (12, 7));
    // A 4x4 checkerboard block averages to mid grey: 2040 / 16 = 127.5 -> 128.
    assert_eq!(out.pixel(0, 0), Some([128, 128, 128, 255]));
}

#[test]
fn stored_palette_drives_snapping() {
    let mut book = PersistentPalette::open(MemoryStore::new());
    book.add("#ff0000, nonsense, #808080").unwrap();
    let (palette, store) = book.into_inner();
    assert_eq!(palette.len(), 2);

    let out = pixelate(&checkerboard(4, 4), 2, &palette);
    assert!(out.as_raw().chunks_exact(4).all(|px| px == [128, 128, 128, 255]));

    let reloaded = PersistentPalette::open(store);
    assert_eq!(reloaded.palette(), &palette);
}

#[test]
fn default_block_size_when_nothing_requested() {
    let src = checkerboard(25, 25);
    let out = pixelate_with(&src, &PixelateOptions::default(), &Palette::new());
    assert_eq!(out.grid.block_size, 10);
    assert_eq!((out.grid.count_x, out.grid.count_y), (2, 2));
    // Bottom right block is the clipped 5x5 corner: 13 black, 12 white.
    // 12 * 255 / 25 = 122.4 -> 122.
    assert_eq!(out.bitmap.pixel(24, 24), Some([122, 122, 122, 255]));
}

#[test]
fn undecodable_input_is_an_error() {
    assert!(pixelate_bytes(b"\x89PNG broken", &PixelateOptions::default(), &Palette::new()).is_err());
}

fn arb_bitmap() -> impl Strategy<Value = Bitmap> {
    (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<u8>(), (w * h * 4) as usize)
            .prop_map(move |data| Bitmap::from_rgba(w, h, data).unwrap())
    })
}

proptest! {
    #[test]
    fn output_matches_source_dimensions(src in arb_bitmap(), block in 0u32..16) {
        let out = pixelate(&src, block, &Palette::new());
        prop_assert_eq!(out.dimensions(), src.dimensions());
        prop_assert_eq!(out.as_raw().len(), src.as_raw().len());
    }

    #[test]
    fn rerun_is_identical(src in arb_bitmap(), block in 1u32..8) {
        let palette: Palette = [Color::new(0, 0, 0), Color::new(255, 128, 0)].into_iter().collect();
        prop_assert_eq!(pixelate(&src, block, &palette), pixelate(&src, block, &palette));
    }

    #[test]
    fn pixelating_twice_changes_nothing(src in arb_bitmap(), block in 1u32..8) {
        let once = pixelate(&src, block, &Palette::new());
        let twice = pixelate(&once, block, &Palette::new());
        prop_assert_eq!(once, twice);
    }
}
