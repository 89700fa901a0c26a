// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Parsed view of the IHDR header chunk.

use super::error::{PngError, Result};

/// PNG color type (IHDR byte 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Grayscale = 0,
    Rgb = 2,
    Palette = 3,
    GrayscaleAlpha = 4,
    RgbAlpha = 6,
}

impl ColorType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Grayscale),
            2 => Some(Self::Rgb),
            3 => Some(Self::Palette),
            4 => Some(Self::GrayscaleAlpha),
            6 => Some(Self::RgbAlpha),
            _ => None,
        }
    }

    /// Human-readable pixel layout description for the inspector surface.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Grayscale => "Each pixel is a grayscale sample.",
            Self::Rgb => "Each pixel is an R,G,B triple.",
            Self::Palette => "Each pixel is a palette index.",
            Self::GrayscaleAlpha => "Each pixel is a grayscale sample, followed by an alpha sample.",
            Self::RgbAlpha => "Each pixel is an R,G,B triple, followed by an alpha sample.",
        }
    }
}

/// Decoded IHDR fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IhdrInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

impl IhdrInfo {
    /// Parse the 13-byte IHDR payload.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() != 13 {
            return Err(PngError::InvalidIhdr("payload must be exactly 13 bytes"));
        }
        let width = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let height = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);
        let color_type = ColorType::from_u8(payload[9])
            .ok_or(PngError::InvalidIhdr("unknown color type"))?;
        Ok(Self {
            width,
            height,
            bit_depth: payload[8],
            color_type,
            compression_method: payload[10],
            filter_method: payload[11],
            interlace_method: payload[12],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ihdr_payload(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
        let mut p = Vec::with_capacity(13);
        p.extend_from_slice(&width.to_be_bytes());
        p.extend_from_slice(&height.to_be_bytes());
        p.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
        p
    }

    #[test]
    fn parses_rgb_header() {
        let info = IhdrInfo::parse(&ihdr_payload(640, 480, 8, 2)).unwrap();
        assert_eq!(info.width, 640);
        assert_eq!(info.height, 480);
        assert_eq!(info.bit_depth, 8);
        assert_eq!(info.color_type, ColorType::Rgb);
        assert_eq!(info.interlace_method, 0);
    }

    #[test]
    fn rejects_wrong_length() {
        let result = IhdrInfo::parse(&[0u8; 12]);
        assert!(matches!(result, Err(PngError::InvalidIhdr(_))));
    }

    #[test]
    fn rejects_unknown_color_type() {
        let result = IhdrInfo::parse(&ihdr_payload(1, 1, 8, 5));
        assert!(matches!(result, Err(PngError::InvalidIhdr(_))));
    }
}
