mod ram;
mod rom;

pub use ram::{DEFAULT_RAM_WORDS, RamDevice};
pub use rom::RomDevice;

use crate::error::{Access, MemoryError};

fn as_write(error: MemoryError) -> MemoryError {
    match error {
        MemoryError::OutOfBounds {
            address, capacity, ..
        } => MemoryError::OutOfBounds {
            access: Access::Write,
            address,
            capacity,
        },
        other => other,
    }
}

/// Word-addressed storage: a byte address selects word `address / 4`.
/// Sub-word accesses pick a little-endian lane inside that word.
pub trait MMIODevice {
    fn read_word(&self, address: u32) -> Result<u32, MemoryError>;
    fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryError>;

    fn read_half_word(&self, address: u32) -> Result<u16, MemoryError> {
        let word = self.read_word(address)?;
        Ok((word >> ((address & 0b10) * 8)) as u16)
    }

    fn read_byte(&self, address: u32) -> Result<u8, MemoryError> {
        let word = self.read_word(address)?;
        Ok((word >> ((address & 0b11) * 8)) as u8)
    }

    fn write_half_word(&mut self, address: u32, value: u16) -> Result<(), MemoryError> {
        let shift = (address & 0b10) * 8;
        let word = self.read_word(address).map_err(as_write)?;
        self.write_word(
            address,
            (word & !(0xFFFF << shift)) | ((value as u32) << shift),
        )
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryError> {
        let shift = (address & 0b11) * 8;
        let word = self.read_word(address).map_err(as_write)?;
        self.write_word(address, (word & !(0xFF << shift)) | ((value as u32) << shift))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemInterface {
    pub rom: RomDevice,
    pub ram: RamDevice,
}

impl SystemInterface {
    pub fn new(rom: RomDevice, ram: RamDevice) -> Self {
        Self { rom, ram }
    }
}
