use std::fmt;

use crate::{
    error::MemoryError,
    registers::{REGISTER_COUNT, RegisterFile, abi_name},
    system_interface::RamDevice,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub registers: [u32; REGISTER_COUNT],
    pub memory: Vec<u32>,
    pub pc: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterChange {
    pub index: u8,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryChange {
    /// Byte address of the changed word.
    pub address: u32,
    pub value: u32,
}

/// Everything a cycle changed, plus the memory access it had to skip, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub registers: Vec<RegisterChange>,
    pub memory: Vec<MemoryChange>,
    pub pc: u32,
    pub fault: Option<MemoryError>,
}

impl Snapshot {
    pub fn capture(reg_file: &RegisterFile, ram: &RamDevice, pc: u32) -> Self {
        Self {
            registers: *reg_file.as_array(),
            memory: ram.words().to_vec(),
            pc,
        }
    }

    pub fn diff(&self, after: &Snapshot, cycle: u64, fault: Option<MemoryError>) -> CycleReport {
        let registers = self
            .registers
            .iter()
            .zip(after.registers.iter())
            .enumerate()
            .filter(|(_, (old, new))| old != new)
            .map(|(index, (_, &value))| RegisterChange {
                index: index as u8,
                value,
            })
            .collect();

        let memory = self
            .memory
            .iter()
            .zip(after.memory.iter())
            .enumerate()
            .filter(|(_, (old, new))| old != new)
            .map(|(index, (_, &value))| MemoryChange {
                address: (index * 4) as u32,
                value,
            })
            .collect();

        CycleReport {
            cycle,
            registers,
            memory,
            pc: after.pc,
            fault,
        }
    }
}

impl CycleReport {
    pub fn register(&self, index: u8) -> Option<u32> {
        self.registers
            .iter()
            .find(|change| change.index == index)
            .map(|change| change.value)
    }

    pub fn memory_at(&self, address: u32) -> Option<u32> {
        self.memory
            .iter()
            .find(|change| change.address == address)
            .map(|change| change.value)
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total_clock_cycles {} :", self.cycle)?;
        for change in &self.registers {
            writeln!(
                f,
                "{} is modified to {:#x}",
                abi_name(change.index as usize),
                change.value
            )?;
        }
        for change in &self.memory {
            writeln!(
                f,
                "memory {:#x} is modified to {:#x}",
                change.address, change.value
            )?;
        }
        write!(f, "pc is modified to {:#x}", self.pc)
    }
}
