use wasm_bindgen::JsValue;

/// Errors raised at the collaborator boundaries: decoding, encoding and
/// palette persistence. The engine itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum PixelateError {
    #[error("Unable to decode image: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Invalid bitmap: {width}x{height} with {len} bytes of RGBA data")]
    InvalidBitmap { width: u32, height: u32, len: usize },

    #[error("Palette store error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<PixelateError> for JsValue {
    fn from(error: PixelateError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

pub type Result<T, E = PixelateError> = std::result::Result<T, E>;
