use super::MMIODevice;
use crate::error::{Access, MemoryError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomDevice {
    rom: Vec<u32>,
}

impl RomDevice {
    pub fn new() -> Self {
        Self { rom: Vec::new() }
    }

    pub fn load(&mut self, data: Vec<u32>) {
        self.rom = data;
    }

    pub fn len(&self) -> usize {
        self.rom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rom.is_empty()
    }
}

impl MMIODevice for RomDevice {
    fn read_word(&self, address: u32) -> Result<u32, MemoryError> {
        self.rom
            .get((address / 4) as usize)
            .copied()
            .ok_or(MemoryError::OutOfBounds {
                access: Access::Read,
                address,
                capacity: self.rom.len(),
            })
    }

    fn write_word(&mut self, address: u32, _value: u32) -> Result<(), MemoryError> {
        Err(MemoryError::ReadOnly { address })
    }
}
