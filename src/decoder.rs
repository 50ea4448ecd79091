//! Format decoders for the supported RV32I subset.
//!
//! Bits are numbered little-endian: bit 0 is the least significant bit of the
//! word and the opcode occupies bits 6:0.

use crate::{
    error::DecodeError,
    instruction::{Instruction, Operation},
    utils::{bit, extract, field, sign_extend_32, slice_32},
};

pub const OPCODE_OP: u8 = 0b011_0011;
pub const OPCODE_OP_IMM: u8 = 0b001_0011;
pub const OPCODE_LOAD: u8 = 0b000_0011;
pub const OPCODE_JALR: u8 = 0b110_0111;
pub const OPCODE_STORE: u8 = 0b010_0011;
pub const OPCODE_BRANCH: u8 = 0b110_0011;
pub const OPCODE_LUI: u8 = 0b011_0111;
pub const OPCODE_AUIPC: u8 = 0b001_0111;
pub const OPCODE_JAL: u8 = 0b110_1111;

const FUNCT7_BASE: u8 = 0b000_0000;
const FUNCT7_ALT: u8 = 0b010_0000;

pub fn opcode(word: u32) -> u8 {
    field(word, 0, 7) as u8
}

fn rd(word: u32) -> u8 {
    field(word, 7, 5) as u8
}

fn funct3(word: u32) -> u8 {
    field(word, 12, 3) as u8
}

fn rs1(word: u32) -> u8 {
    field(word, 15, 5) as u8
}

fn rs2(word: u32) -> u8 {
    field(word, 20, 5) as u8
}

fn funct7(word: u32) -> u8 {
    field(word, 25, 7) as u8
}

/// Decodes one instruction word without touching any machine state.
///
/// Opcodes outside the supported table fail with [`DecodeError::UnknownOpcode`].
/// A supported opcode with an unrecognised funct3/funct7 combination decodes
/// to [`Operation::Unknown`] so the caller can still inspect its fields.
pub fn decode(word: u32) -> Result<Instruction, DecodeError> {
    let opcode = opcode(word);
    match opcode {
        OPCODE_OP => Ok(decode_r_type(word)),
        OPCODE_OP_IMM | OPCODE_LOAD | OPCODE_JALR => Ok(decode_i_type(word)),
        OPCODE_STORE => Ok(decode_s_type(word)),
        OPCODE_BRANCH => Ok(decode_b_type(word)),
        OPCODE_LUI | OPCODE_AUIPC => Ok(decode_u_type(word)),
        OPCODE_JAL => Ok(decode_j_type(word)),
        _ => Err(DecodeError::UnknownOpcode { word, opcode }),
    }
}

pub fn decode_r_type(word: u32) -> Instruction {
    let funct3 = funct3(word);
    let funct7 = funct7(word);

    let op = match (funct3, funct7) {
        (0b000, FUNCT7_BASE) => Operation::Add,
        (0b000, FUNCT7_ALT) => Operation::Sub,
        (0b001, FUNCT7_BASE) => Operation::Sll,
        (0b010, FUNCT7_BASE) => Operation::Slt,
        (0b011, FUNCT7_BASE) => Operation::Sltu,
        (0b100, FUNCT7_BASE) => Operation::Xor,
        (0b101, FUNCT7_BASE) => Operation::Srl,
        (0b101, FUNCT7_ALT) => Operation::Sra,
        (0b110, FUNCT7_BASE) => Operation::Or,
        (0b111, FUNCT7_BASE) => Operation::And,
        _ => Operation::Unknown,
    };

    Instruction::R {
        op,
        rd: rd(word),
        rs1: rs1(word),
        rs2: rs2(word),
        funct3,
        funct7,
    }
}

pub fn decode_i_type(word: u32) -> Instruction {
    let funct3 = funct3(word);
    // imm[11:5] doubles as funct7 for the immediate shifts
    let upper = funct7(word);

    let op = match opcode(word) {
        OPCODE_LOAD => match funct3 {
            0b000 => Operation::Lb,
            0b001 => Operation::Lh,
            0b010 => Operation::Lw,
            _ => Operation::Unknown,
        },
        OPCODE_JALR => match funct3 {
            0b000 => Operation::Jalr,
            _ => Operation::Unknown,
        },
        OPCODE_OP_IMM => match (funct3, upper) {
            (0b000, _) => Operation::Addi,
            (0b010, _) => Operation::Slti,
            (0b011, _) => Operation::Sltiu,
            (0b100, _) => Operation::Xori,
            (0b110, _) => Operation::Ori,
            (0b111, _) => Operation::Andi,
            (0b001, FUNCT7_BASE) => Operation::Slli,
            (0b101, FUNCT7_BASE) => Operation::Srli,
            (0b101, FUNCT7_ALT) => Operation::Srai,
            _ => Operation::Unknown,
        },
        _ => Operation::Unknown,
    };

    Instruction::I {
        op,
        rd: rd(word),
        rs1: rs1(word),
        funct3,
        imm: extract(word, 20, 12, true),
    }
}

pub fn decode_s_type(word: u32) -> Instruction {
    let funct3 = funct3(word);
    let op = match funct3 {
        0b000 => Operation::Sb,
        0b001 => Operation::Sh,
        0b010 => Operation::Sw,
        _ => Operation::Unknown,
    };

    let restructured_imm = slice_32(31, 25, word, 12) | slice_32(11, 7, word, 5);

    Instruction::S {
        op,
        rs1: rs1(word),
        rs2: rs2(word),
        funct3,
        imm: sign_extend_32(12, restructured_imm as i32),
    }
}

pub fn decode_b_type(word: u32) -> Instruction {
    let funct3 = funct3(word);
    let op = match funct3 {
        0b000 => Operation::Beq,
        0b001 => Operation::Bne,
        0b100 => Operation::Blt,
        0b101 => Operation::Bge,
        _ => Operation::Unknown,
    };

    // imm[12|10:5] in bits 31:25, imm[4:1|11] in bits 11:7
    let restructured_imm = bit(31, word, 12)
        | bit(7, word, 11)
        | slice_32(30, 25, word, 10)
        | slice_32(11, 8, word, 4);

    Instruction::B {
        op,
        rs1: rs1(word),
        rs2: rs2(word),
        funct3,
        imm: sign_extend_32(13, (restructured_imm << 1) as i32),
    }
}

pub fn decode_u_type(word: u32) -> Instruction {
    let op = match opcode(word) {
        OPCODE_LUI => Operation::Lui,
        OPCODE_AUIPC => Operation::Auipc,
        _ => Operation::Unknown,
    };

    Instruction::U {
        op,
        rd: rd(word),
        imm: ((word >> 12) << 12) as i32,
    }
}

pub fn decode_j_type(word: u32) -> Instruction {
    let op = match opcode(word) {
        OPCODE_JAL => Operation::Jal,
        _ => Operation::Unknown,
    };

    // imm[20|10:1|11|19:12] in bits 31:12
    let restructured_imm = bit(31, word, 20)
        | slice_32(19, 12, word, 19)
        | bit(20, word, 11)
        | slice_32(30, 21, word, 10);

    Instruction::J {
        op,
        rd: rd(word),
        imm: sign_extend_32(21, (restructured_imm << 1) as i32),
    }
}
