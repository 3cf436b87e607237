//! Firmware images
//!
//! A firmware binary is uploaded in fixed size blocks, followed by an
//! upgrade command carrying the total size and a CRC-32 over the whole image.

use std::path::Path;

use bytes::Bytes;
use crc::{Crc, CRC_32_ISO_HDLC};
use tracing::debug;

use crate::{
    constants::firmware::BLOCK_SIZE,
    error::{Error, Result},
    requests::{StartFirmwareUpgradePacket, StoreFirmwareBlockPacket},
};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Largest image the 16-bit block numbering can address
pub const MAX_IMAGE_SIZE: usize = BLOCK_SIZE * (u16::MAX as usize + 1);

/// Firmware binary split into blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    blocks: Vec<Bytes>,
    total_size: u32,
    crc: u32,
}

impl FirmwareImage {
    /// Split a firmware binary into blocks
    ///
    /// # Errors
    ///
    /// Returns an error if the image is empty or too large.
    pub fn new(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();

        if data.is_empty() {
            return Err(Error::EmptyFirmware);
        }

        if data.len() > MAX_IMAGE_SIZE {
            return Err(Error::FirmwareTooLarge {
                size: data.len(),
                max: MAX_IMAGE_SIZE,
            });
        }

        let blocks = (0..data.len())
            .step_by(BLOCK_SIZE)
            .map(|start| data.slice(start..(start + BLOCK_SIZE).min(data.len())))
            .collect::<Vec<_>>();

        let crc = CRC32.checksum(&data);

        debug!(
            size = data.len(),
            blocks = blocks.len(),
            crc = format!("0x{:08X}", crc),
            "Loaded firmware image"
        );

        Ok(Self {
            blocks,
            total_size: data.len() as u32,
            crc,
        })
    }

    /// Read a firmware binary from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::new(data)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Packet storing block `number`
    pub fn block_packet(&self, number: usize) -> Option<StoreFirmwareBlockPacket> {
        self.blocks
            .get(number)
            .map(|data| StoreFirmwareBlockPacket::new(number as u16, data.clone()))
    }

    /// Packet starting the upgrade once every block is stored
    pub fn upgrade_packet(&self) -> StartFirmwareUpgradePacket {
        StartFirmwareUpgradePacket::new(self.total_size, self.crc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;

    #[test]
    fn test_crc_matches_zlib() {
        let image = FirmwareImage::new(&b"123456789"[..]).unwrap();
        assert_eq!(image.crc(), 0xCBF4_3926);
        assert_eq!(image.total_size(), 9);
        assert_eq!(image.block_count(), 1);
    }

    #[test]
    fn test_blocks() {
        let image = FirmwareImage::new(vec![0x11; BLOCK_SIZE * 2 + 10]).unwrap();
        assert_eq!(image.block_count(), 3);

        let last = image.block_packet(2).unwrap();
        assert_eq!(last.number, 2);
        assert_eq!(last.data.len(), 10);

        assert!(image.block_packet(3).is_none());
    }

    #[test]
    fn test_upgrade_packet() {
        let image = FirmwareImage::new(vec![1, 2, 3]).unwrap();
        let packet = image.upgrade_packet();
        assert_eq!(packet.total_size, 3);
        assert_eq!(packet.crc, image.crc());
    }

    #[test]
    fn test_empty_image() {
        assert!(matches!(FirmwareImage::new(Vec::new()), Err(Error::EmptyFirmware)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x42; 300]).unwrap();

        let image = FirmwareImage::load(file.path()).unwrap();
        assert_eq!(image.block_count(), 2);
        assert_eq!(image.total_size(), 300);
    }

    proptest! {
        #[test]
        fn prop_blocks_cover_image(data in proptest::collection::vec(any::<u8>(), 1..2048)) {
            let image = FirmwareImage::new(data.clone()).unwrap();

            let mut joined = Vec::new();
            for n in 0..image.block_count() {
                let packet = image.block_packet(n).unwrap();
                prop_assert!(packet.data.len() <= BLOCK_SIZE);
                joined.extend_from_slice(&packet.data);
            }

            prop_assert_eq!(joined, data);
        }
    }
}
