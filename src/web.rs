//! JavaScript bindings.
//!
//! The page owns file picking, canvas drawing, downloads and local storage;
//! these functions only transform bytes. Palette persistence goes through
//! `Palette.toJson()` / `Palette.fromJson()`.

use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::bitmap::Bitmap;
use crate::engine::{PixelateOptions, pixelate as pixelate_bitmap, pixelate_with};
use crate::palette_store::Palette;
use crate::sizing::{Sizing, resolve_block_size as resolve};

fn palette_from_js(palette: Option<Array>) -> Result<Palette, JsValue> {
    let Some(js_palette) = palette else {
        return Ok(Palette::new());
    };
    let mut entries = Vec::with_capacity(js_palette.length() as usize);
    for val in js_palette.iter() {
        let s = val
            .as_string()
            .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
        entries.push(s);
    }
    Ok(Palette::from(entries))
}

fn result_object(png: &[u8], block_size: u32, count_x: u32, count_y: u32) -> Result<Object, JsValue> {
    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(png))?;
    Reflect::set(&result, &JsValue::from_str("blockSize"), &JsValue::from(block_size))?;
    Reflect::set(&result, &JsValue::from_str("countX"), &JsValue::from(count_x))?;
    Reflect::set(&result, &JsValue::from_str("countY"), &JsValue::from(count_y))?;
    Ok(result)
}

/// Decode `input`, pixelate it and return
/// `{ image: Uint8Array (PNG), blockSize, countX, countY }`.
///
/// `blockCount` wins over `blockSize` when it is a positive number.
#[wasm_bindgen(js_name = pixelate)]
pub fn pixelate_image(
    input: Vec<u8>,
    block_count: Option<i32>,
    block_size: Option<i32>,
    palette: Option<Array>,
) -> Result<Object, JsValue> {
    let source = Bitmap::decode(&input)?;
    let palette = palette_from_js(palette)?;
    let options = PixelateOptions {
        sizing: Sizing::from_signed(block_count.map(i64::from), block_size.map(i64::from)),
    };
    let out = pixelate_with(&source, &options, &palette);
    let png = out.bitmap.encode_png()?;
    result_object(&png, out.grid.block_size, out.grid.count_x, out.grid.count_y)
}

/// Pixelate raw canvas `ImageData` bytes in place of a decoded file.
#[wasm_bindgen(js_name = pixelateRgba)]
pub fn pixelate_rgba(
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    block_size: u32,
    palette: Option<Array>,
) -> Result<Vec<u8>, JsValue> {
    let source = Bitmap::from_rgba(width, height, rgba)?;
    let palette = palette_from_js(palette)?;
    Ok(pixelate_bitmap(&source, block_size, &palette).into_raw())
}

#[wasm_bindgen(js_name = resolveBlockSize)]
pub fn resolve_block_size(width: u32, block_count: Option<i32>, block_size: Option<i32>) -> u32 {
    let sizing = Sizing::from_signed(block_count.map(i64::from), block_size.map(i64::from));
    resolve(width, sizing.block_count, sizing.block_size)
}

/// Palette handle exposed to JS as `Palette`.
#[wasm_bindgen(js_name = Palette)]
#[derive(Default)]
pub struct PaletteHandle {
    inner: Palette,
}

#[wasm_bindgen(js_class = Palette)]
impl PaletteHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from local storage contents; malformed data gives an empty palette.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Self {
        Self {
            inner: Palette::from_json(json),
        }
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> String {
        self.inner.to_json()
    }

    /// Returns `"added"`, `"unchanged"` or `"rejected"`.
    pub fn add(&mut self, input: &str) -> String {
        self.inner.add(input).as_str().to_owned()
    }

    #[wasm_bindgen(js_name = removeAt)]
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.inner.remove_at(index).is_some()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn colors(&self) -> Array {
        self.inner
            .colors()
            .iter()
            .map(|c| JsValue::from_str(&c.to_hex()))
            .collect()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    pub fn nearest(&self, r: u8, g: u8, b: u8) -> Option<String> {
        self.inner.nearest(r, g, b).map(|c| c.to_hex())
    }

    /// Same as the free `pixelate` function, snapping to this palette.
    pub fn pixelate(
        &self,
        input: Vec<u8>,
        block_count: Option<i32>,
        block_size: Option<i32>,
    ) -> Result<Object, JsValue> {
        let source = Bitmap::decode(&input)?;
        let options = PixelateOptions {
            sizing: Sizing::from_signed(block_count.map(i64::from), block_size.map(i64::from)),
        };
        let out = pixelate_with(&source, &options, &self.inner);
        let png = out.bitmap.encode_png()?;
        result_object(&png, out.grid.block_size, out.grid.count_x, out.grid.count_y)
    }
}
