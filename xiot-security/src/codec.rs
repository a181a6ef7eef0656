//! Frame codec selection

use xiot_core::{XiotError, XiotResult};

/// How frames are encoded on the wire after the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameCodecType {
    /// Frames travel in clear after the handshake
    #[default]
    NotCrypt = 0,
    /// Frames are encrypted with the negotiated session key
    Crypt = 1,
}

impl FrameCodecType {
    /// Get codec ID
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Get codec from ID
    pub fn from_id(id: u8) -> XiotResult<Self> {
        match id {
            0 => Ok(Self::NotCrypt),
            1 => Ok(Self::Crypt),
            _ => Err(XiotError::InvalidData(format!("Invalid frame codec ID: {}", id))),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Crypt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_ids() {
        assert_eq!(FrameCodecType::from_id(0).unwrap(), FrameCodecType::NotCrypt);
        assert_eq!(FrameCodecType::Crypt.id(), 1);
        assert!(FrameCodecType::from_id(7).is_err());
        assert!(!FrameCodecType::default().is_encrypted());
    }
}
