use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{PixelateError, Result};

/// A decoded RGBA8 image: `width * height * 4` bytes, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGBA bytes. Both dimensions must be positive and the buffer
    /// length must match them exactly.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(PixelateError::InvalidBitmap {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A bitmap filled with a single RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let pixels = (width as usize) * (height as usize);
        Self::from_rgba(width, height, rgba.repeat(pixels))
    }

    /// Decode any format the `image` crate understands.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| PixelateError::Decode(e.to_string()))?;
        Self::try_from(img)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value at `(x, y)`, `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[idx..idx + 4]);
        Some(px)
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Encode as PNG, the export format.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut cursor = std::io::Cursor::new(&mut buf);
            self.to_image()
                .write_to(&mut cursor, ImageFormat::Png)
                .map_err(|e| PixelateError::Encode(e.to_string()))?;
        }
        Ok(buf)
    }
}

impl TryFrom<RgbaImage> for Bitmap {
    type Error = PixelateError;

    fn try_from(img: RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba(width, height, img.into_raw())
    }
}

impl TryFrom<DynamicImage> for Bitmap {
    type Error = PixelateError;

    fn try_from(img: DynamicImage) -> Result<Self> {
        Self::try_from(img.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_mismatch() {
        assert!(matches!(
            Bitmap::from_rgba(2, 2, vec![0; 15]),
            Err(PixelateError::InvalidBitmap { width: 2, height: 2, len: 15 })
        ));
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(Bitmap::from_rgba(0, 3, Vec::new()).is_err());
        assert!(Bitmap::from_rgba(3, 0, Vec::new()).is_err());
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let data: Vec<u8> = (0..2 * 3 * 4).map(|v| v as u8).collect();
        let bmp = Bitmap::from_rgba(2, 3, data).unwrap();
        assert_eq!(bmp.pixel(1, 2), Some([20, 21, 22, 23]));
        assert_eq!(bmp.pixel(2, 0), None);
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let bmp = Bitmap::filled(3, 2, [10, 20, 30, 128]).unwrap();
        let png = bmp.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(Bitmap::decode(&png).unwrap(), bmp);
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(matches!(Bitmap::decode(b"not an image"), Err(PixelateError::Decode(_))));
    }
}
