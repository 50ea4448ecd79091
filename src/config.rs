use clap::ValueEnum;

use crate::{
    error::ConfigError,
    registers::RegisterFile,
    system_interface::{DEFAULT_RAM_WORDS, MMIODevice, RamDevice},
};

pub const DEFAULT_MAX_CYCLES: u64 = 1000;
pub const DEFAULT_MAX_PROGRAM_LEN: usize = 100;
/// Word count covering the whole 32-bit byte address space.
pub const MAX_MEMORY_WORDS: usize = 1 << 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    pub memory_words: usize,
    /// Runaway guard; a run never executes more cycles than this.
    pub max_cycles: u64,
    /// Longest program `load_program` will accept, in instructions.
    pub max_program_len: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            memory_words: DEFAULT_RAM_WORDS,
            max_cycles: DEFAULT_MAX_CYCLES,
            max_program_len: DEFAULT_MAX_PROGRAM_LEN,
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_words > MAX_MEMORY_WORDS {
            return Err(ConfigError::MemoryTooLarge {
                words: self.memory_words,
                max: MAX_MEMORY_WORDS,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    #[default]
    Zeroed,
    Sample1,
    Sample2,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialState {
    pub registers: Vec<(u8, u32)>,
    /// (byte address, word) pairs.
    pub memory: Vec<(u32, u32)>,
}

impl InitialState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: Preset) -> Self {
        let state = Self::new();
        match preset {
            Preset::Zeroed => state,
            Preset::Sample1 => state
                .register(1, 0x20)
                .register(2, 0x5)
                .register(10, 0x70)
                .register(11, 0x4)
                .word(0x70, 0x5)
                .word(0x74, 0x10),
            Preset::Sample2 => state
                .register(1, 0x20)
                .register(2, 0x5)
                .register(8, 0x20)
                .register(10, 0x70)
                .register(11, 0x2)
                .register(12, 0xa)
                .register(13, 0xf)
                .word(0x70, 0x5)
                .word(0x74, 0x10),
        }
    }

    pub fn register(mut self, index: u8, value: u32) -> Self {
        self.registers.push((index, value));
        self
    }

    pub fn word(mut self, address: u32, value: u32) -> Self {
        self.memory.push((address, value));
        self
    }

    /// Validates every entry before touching anything. Entries for x0 are
    /// accepted and ignored.
    pub fn apply(&self, reg_file: &mut RegisterFile, ram: &mut RamDevice) -> Result<(), ConfigError> {
        for &(index, _) in &self.registers {
            RegisterFile::validate(index)?;
        }
        let mut staged = ram.clone();
        for &(address, value) in &self.memory {
            staged.write_word(address, value)?;
        }

        *ram = staged;
        for &(index, value) in &self.registers {
            reg_file.write(index, value)?;
        }
        Ok(())
    }
}
