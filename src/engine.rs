//! Interface to the external raw-development engine.
//!
//! The engine decodes raw files and re-develops them whenever adjustments
//! change. How it does that (demosaic, colour science, worker transport) is
//! its own business; the viewer only consumes RGBA buffers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adjustments::Adjustments;
use crate::constants::RGBA_CHANNELS;

/// Errors reported by a compute engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine could not decode the file
    #[error("Failed to decode {file_name}: {message}")]
    Decode {
        /// File that failed to decode
        file_name: String,
        /// Engine-provided reason
        message: String,
    },

    /// Processing was requested before any file was decoded
    #[error("No image has been decoded yet")]
    NoImage,

    /// Pixel buffer length does not match the reported dimensions
    #[error("RGBA buffer of {actual} bytes does not match {width}x{height} image ({expected} bytes)")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl EngineError {
    /// Create a decode error.
    pub fn decode(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            file_name: file_name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// An 8-bit RGBA pixel buffer with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl DecodedImage {
    /// Wrap a buffer, checking it holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(RGBA_CHANNELS))
            .unwrap_or(usize::MAX);
        if rgba.len() != expected {
            return Err(EngineError::BufferSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

/// Progress stages reported while a raw file is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodeStage {
    #[serde(rename = "decode_obtaining_raw")]
    ObtainingRaw,
    #[serde(rename = "decode_decoding_metadata")]
    DecodingMetadata,
    #[serde(rename = "decode_decoding_raw")]
    DecodingRaw,
    #[serde(rename = "decode_preparing_raw_developer")]
    PreparingRawDeveloper,
    #[serde(rename = "decode_developing_raw")]
    DevelopingRaw,
    #[serde(rename = "decode_complete")]
    Complete,
}

impl DecodeStage {
    /// All stages in the order an engine reports them.
    pub fn all() -> &'static [DecodeStage] {
        &[
            DecodeStage::ObtainingRaw,
            DecodeStage::DecodingMetadata,
            DecodeStage::DecodingRaw,
            DecodeStage::PreparingRawDeveloper,
            DecodeStage::DevelopingRaw,
            DecodeStage::Complete,
        ]
    }

    /// Human-readable description for progress displays.
    pub fn description(&self) -> &'static str {
        match self {
            DecodeStage::ObtainingRaw => "Obtaining Raw",
            DecodeStage::DecodingMetadata => "Decoding Metadata",
            DecodeStage::DecodingRaw => "Decoding Raw",
            DecodeStage::PreparingRawDeveloper => "Preparing Raw Developer",
            DecodeStage::DevelopingRaw => "Developing Raw",
            DecodeStage::Complete => "Complete",
        }
    }
}

/// A raw-development backend.
pub trait ComputeEngine {
    /// Decode a raw file and develop it with `adjustments`.
    ///
    /// Progress stages are reported through `progress` as they happen.
    fn decode(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        adjustments: &Adjustments,
        progress: &mut dyn FnMut(DecodeStage),
    ) -> Result<DecodedImage>;

    /// Re-develop the last decoded file with new adjustments.
    fn process(&mut self, adjustments: &Adjustments) -> Result<DecodedImage>;

    /// Rotate the decoded image a quarter turn clockwise and re-develop it.
    fn rotate(&mut self, adjustments: &Adjustments) -> Result<DecodedImage>;
}
