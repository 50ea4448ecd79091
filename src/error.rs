use thiserror::Error;

use crate::instruction::Format;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown opcode {opcode:#09b} in instruction {word:#010x}")]
    UnknownOpcode { word: u32, opcode: u8 },

    #[error("Unknown {format}-type operation (funct3={funct3:#05b}, funct7={funct7:#09b})")]
    UnknownOperation {
        format: Format,
        funct3: u8,
        funct7: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Read => write!(f, "read"),
            Access::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Memory {access} out of bounds at {address:#x} (capacity {capacity} words)")]
    OutOfBounds {
        access: Access,
        address: u32,
        capacity: usize,
    },

    #[error("Write to read-only program memory at {address:#x}")]
    ReadOnly { address: u32 },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    #[error("Register index {0} is out of range (0-31)")]
    OutOfRange(u8),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AluError {
    #[error("Unknown ALU operation code {0:#06b}")]
    UnknownOperation(u8),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("PC out of bounds: {pc:#x} is past the end of a {program_len}-instruction program")]
    FetchOutOfBounds { pc: u32, program_len: usize },

    #[error("Illegal instruction at {pc:#x}: {source}")]
    IllegalInstruction {
        pc: u32,
        #[source]
        source: DecodeError,
    },

    #[error("ALU failure at {pc:#x}: {source}")]
    Alu {
        pc: u32,
        #[source]
        source: AluError,
    },

    #[error("Register access at {pc:#x}: {source}")]
    Register {
        pc: u32,
        #[source]
        source: RegisterError,
    },

    #[error("Control transfer at {pc:#x} to misaligned target {target:#x}")]
    MisalignedTarget { pc: u32, target: u32 },

    #[error("Execution limit of {limit} cycles reached, possible infinite loop")]
    RunawayExecution { limit: u64 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read program: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid character {found:?} at line {line}, column {column}")]
    InvalidCharacter {
        line: usize,
        column: usize,
        found: char,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Data memory of {words} words exceeds the {max}-word address space")]
    MemoryTooLarge { words: usize, max: usize },

    #[error("Invalid initial register value: {0}")]
    Register(#[from] RegisterError),

    #[error("Invalid initial memory value: {0}")]
    Memory(#[from] MemoryError),
}
