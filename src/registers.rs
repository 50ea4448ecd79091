use crate::error::RegisterError;

pub const REGISTER_COUNT: usize = 32;

pub const ABI_NAMES: [&str; REGISTER_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// General purpose registers. x0 reads as zero and ignores writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterFile {
    regs: [u32; REGISTER_COUNT],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(index: u8) -> Result<usize, RegisterError> {
        let index = index as usize;
        if index < REGISTER_COUNT {
            Ok(index)
        } else {
            Err(RegisterError::OutOfRange(index as u8))
        }
    }

    pub fn read(&self, index: u8) -> Result<u32, RegisterError> {
        Ok(self.regs[Self::validate(index)?])
    }

    /// Returns whether the write was committed; writes to x0 are discarded.
    pub fn write(&mut self, index: u8, value: u32) -> Result<bool, RegisterError> {
        let index = Self::validate(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.regs[index] = value;
        Ok(true)
    }

    pub fn as_array(&self) -> &[u32; REGISTER_COUNT] {
        &self.regs
    }
}

pub fn abi_name(index: usize) -> &'static str {
    ABI_NAMES.get(index).copied().unwrap_or("?")
}
