//! Inverse of the format decoders, used to build instruction words in tests.

use crate::{
    decoder::{
        OPCODE_AUIPC, OPCODE_BRANCH, OPCODE_JAL, OPCODE_JALR, OPCODE_LOAD, OPCODE_LUI, OPCODE_OP,
        OPCODE_OP_IMM, OPCODE_STORE,
    },
    instruction::{Instruction, Operation},
};

fn opcode_of(op: Operation) -> u32 {
    (match op {
        Operation::Add
        | Operation::Sub
        | Operation::And
        | Operation::Or
        | Operation::Xor
        | Operation::Sll
        | Operation::Srl
        | Operation::Sra
        | Operation::Slt
        | Operation::Sltu => OPCODE_OP,
        Operation::Lb | Operation::Lh | Operation::Lw => OPCODE_LOAD,
        Operation::Jalr => OPCODE_JALR,
        Operation::Sb | Operation::Sh | Operation::Sw => OPCODE_STORE,
        Operation::Beq | Operation::Bne | Operation::Blt | Operation::Bge => OPCODE_BRANCH,
        Operation::Lui => OPCODE_LUI,
        Operation::Auipc => OPCODE_AUIPC,
        Operation::Jal => OPCODE_JAL,
        _ => OPCODE_OP_IMM,
    }) as u32
}

pub fn encode(instruction: &Instruction) -> u32 {
    let opcode = opcode_of(instruction.operation());
    match *instruction {
        Instruction::R {
            rd,
            rs1,
            rs2,
            funct3,
            funct7,
            ..
        } => {
            (funct7 as u32) << 25
                | (rs2 as u32) << 20
                | (rs1 as u32) << 15
                | (funct3 as u32) << 12
                | (rd as u32) << 7
                | opcode
        }
        Instruction::I {
            rd,
            rs1,
            funct3,
            imm,
            ..
        } => {
            ((imm as u32) & 0xFFF) << 20
                | (rs1 as u32) << 15
                | (funct3 as u32) << 12
                | (rd as u32) << 7
                | opcode
        }
        Instruction::S {
            rs1,
            rs2,
            funct3,
            imm,
            ..
        } => {
            let imm = imm as u32;
            ((imm >> 5) & 0x7F) << 25
                | (rs2 as u32) << 20
                | (rs1 as u32) << 15
                | (funct3 as u32) << 12
                | (imm & 0x1F) << 7
                | opcode
        }
        Instruction::B {
            rs1,
            rs2,
            funct3,
            imm,
            ..
        } => {
            let imm = imm as u32;
            ((imm >> 12) & 1) << 31
                | ((imm >> 5) & 0x3F) << 25
                | (rs2 as u32) << 20
                | (rs1 as u32) << 15
                | (funct3 as u32) << 12
                | ((imm >> 1) & 0xF) << 8
                | ((imm >> 11) & 1) << 7
                | opcode
        }
        Instruction::U { rd, imm, .. } => (imm as u32) & 0xFFFF_F000 | (rd as u32) << 7 | opcode,
        Instruction::J { rd, imm, .. } => {
            let imm = imm as u32;
            ((imm >> 20) & 1) << 31
                | ((imm >> 1) & 0x3FF) << 21
                | ((imm >> 11) & 1) << 20
                | ((imm >> 12) & 0xFF) << 12
                | (rd as u32) << 7
                | opcode
        }
    }
}

pub fn r(op: Operation, rd: u8, rs1: u8, rs2: u8) -> u32 {
    let (funct3, funct7) = match op {
        Operation::Add => (0b000, 0x00),
        Operation::Sub => (0b000, 0x20),
        Operation::Sll => (0b001, 0x00),
        Operation::Slt => (0b010, 0x00),
        Operation::Sltu => (0b011, 0x00),
        Operation::Xor => (0b100, 0x00),
        Operation::Srl => (0b101, 0x00),
        Operation::Sra => (0b101, 0x20),
        Operation::Or => (0b110, 0x00),
        Operation::And => (0b111, 0x00),
        _ => panic!("{op} is not an R-type operation"),
    };
    encode(&Instruction::R {
        op,
        rd,
        rs1,
        rs2,
        funct3,
        funct7,
    })
}

pub fn i(op: Operation, rd: u8, rs1: u8, imm: i32) -> u32 {
    let (funct3, imm) = match op {
        Operation::Addi | Operation::Lb | Operation::Jalr => (0b000, imm),
        Operation::Slli => (0b001, imm & 0x1F),
        Operation::Lh => (0b001, imm),
        Operation::Slti | Operation::Lw => (0b010, imm),
        Operation::Sltiu => (0b011, imm),
        Operation::Xori => (0b100, imm),
        Operation::Srli => (0b101, imm & 0x1F),
        Operation::Srai => (0b101, (imm & 0x1F) | 0x400),
        Operation::Ori => (0b110, imm),
        Operation::Andi => (0b111, imm),
        _ => panic!("{op} is not an I-type operation"),
    };
    encode(&Instruction::I {
        op,
        rd,
        rs1,
        funct3,
        imm,
    })
}

pub fn s(op: Operation, rs2: u8, rs1: u8, imm: i32) -> u32 {
    let funct3 = match op {
        Operation::Sb => 0b000,
        Operation::Sh => 0b001,
        Operation::Sw => 0b010,
        _ => panic!("{op} is not an S-type operation"),
    };
    encode(&Instruction::S {
        op,
        rs1,
        rs2,
        funct3,
        imm,
    })
}

pub fn b(op: Operation, rs1: u8, rs2: u8, imm: i32) -> u32 {
    let funct3 = match op {
        Operation::Beq => 0b000,
        Operation::Bne => 0b001,
        Operation::Blt => 0b100,
        Operation::Bge => 0b101,
        _ => panic!("{op} is not a B-type operation"),
    };
    encode(&Instruction::B {
        op,
        rs1,
        rs2,
        funct3,
        imm,
    })
}

pub fn u(op: Operation, rd: u8, imm: i32) -> u32 {
    encode(&Instruction::U { op, rd, imm })
}

pub fn j(rd: u8, imm: i32) -> u32 {
    encode(&Instruction::J {
        op: Operation::Jal,
        rd,
        imm,
    })
}
