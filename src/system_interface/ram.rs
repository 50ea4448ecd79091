use super::MMIODevice;
use crate::error::{Access, MemoryError};

pub const DEFAULT_RAM_WORDS: usize = 32;

/// Never wraps: an address past the end is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamDevice {
    ram: Vec<u32>,
}

impl RamDevice {
    pub fn new(words: usize) -> Self {
        RamDevice {
            ram: vec![0; words],
        }
    }

    pub fn capacity(&self) -> usize {
        self.ram.len()
    }

    pub fn words(&self) -> &[u32] {
        &self.ram
    }

    fn index(&self, address: u32, access: Access) -> Result<usize, MemoryError> {
        let index = (address / 4) as usize;
        if index < self.ram.len() {
            Ok(index)
        } else {
            Err(MemoryError::OutOfBounds {
                access,
                address,
                capacity: self.ram.len(),
            })
        }
    }
}

impl Default for RamDevice {
    fn default() -> Self {
        Self::new(DEFAULT_RAM_WORDS)
    }
}

impl MMIODevice for RamDevice {
    fn read_word(&self, address: u32) -> Result<u32, MemoryError> {
        let index = self.index(address, Access::Read)?;
        Ok(self.ram[index])
    }

    fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        let index = self.index(address, Access::Write)?;
        self.ram[index] = value;
        Ok(())
    }
}
