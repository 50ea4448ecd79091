use std::fmt;

/// Base encoding formats of the 32-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    R,
    I,
    S,
    B,
    U,
    J,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::R => "R",
            Format::I => "I",
            Format::S => "S",
            Format::B => "B",
            Format::U => "U",
            Format::J => "J",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // R-type
    Add,
    Sub,
    And,
    Or,
    Xor,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,
    // I-type ALU
    Addi,
    Andi,
    Ori,
    Xori,
    Slti,
    Sltiu,
    Slli,
    Srli,
    Srai,
    // I-type loads
    Lb,
    Lh,
    Lw,
    Jalr,
    // S-type
    Sb,
    Sh,
    Sw,
    // B-type
    Beq,
    Bne,
    Blt,
    Bge,
    // U-type
    Lui,
    Auipc,
    // J-type
    Jal,
    /// A known opcode whose funct3/funct7 combination matches no operation.
    Unknown,
}

impl Operation {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::And => "and",
            Operation::Or => "or",
            Operation::Xor => "xor",
            Operation::Sll => "sll",
            Operation::Srl => "srl",
            Operation::Sra => "sra",
            Operation::Slt => "slt",
            Operation::Sltu => "sltu",
            Operation::Addi => "addi",
            Operation::Andi => "andi",
            Operation::Ori => "ori",
            Operation::Xori => "xori",
            Operation::Slti => "slti",
            Operation::Sltiu => "sltiu",
            Operation::Slli => "slli",
            Operation::Srli => "srli",
            Operation::Srai => "srai",
            Operation::Lb => "lb",
            Operation::Lh => "lh",
            Operation::Lw => "lw",
            Operation::Jalr => "jalr",
            Operation::Sb => "sb",
            Operation::Sh => "sh",
            Operation::Sw => "sw",
            Operation::Beq => "beq",
            Operation::Bne => "bne",
            Operation::Blt => "blt",
            Operation::Bge => "bge",
            Operation::Lui => "lui",
            Operation::Auipc => "auipc",
            Operation::Jal => "jal",
            Operation::Unknown => "unknown",
        }
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Operation::Lb | Operation::Lh | Operation::Lw)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A decoded instruction word. Each format only carries the fields its
/// encoding defines; immediates are already reassembled and sign-extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    R {
        op: Operation,
        rd: u8,
        rs1: u8,
        rs2: u8,
        funct3: u8,
        funct7: u8,
    },
    I {
        op: Operation,
        rd: u8,
        rs1: u8,
        funct3: u8,
        imm: i32,
    },
    S {
        op: Operation,
        rs1: u8,
        rs2: u8,
        funct3: u8,
        imm: i32,
    },
    B {
        op: Operation,
        rs1: u8,
        rs2: u8,
        funct3: u8,
        imm: i32,
    },
    /// `imm` holds bits 31:12 in place, the low 12 bits are zero.
    U { op: Operation, rd: u8, imm: i32 },
    J { op: Operation, rd: u8, imm: i32 },
}

impl Instruction {
    pub fn format(&self) -> Format {
        match self {
            Instruction::R { .. } => Format::R,
            Instruction::I { .. } => Format::I,
            Instruction::S { .. } => Format::S,
            Instruction::B { .. } => Format::B,
            Instruction::U { .. } => Format::U,
            Instruction::J { .. } => Format::J,
        }
    }

    pub fn operation(&self) -> Operation {
        match *self {
            Instruction::R { op, .. }
            | Instruction::I { op, .. }
            | Instruction::S { op, .. }
            | Instruction::B { op, .. }
            | Instruction::U { op, .. }
            | Instruction::J { op, .. } => op,
        }
    }

    pub fn rd(&self) -> Option<u8> {
        match *self {
            Instruction::R { rd, .. }
            | Instruction::I { rd, .. }
            | Instruction::U { rd, .. }
            | Instruction::J { rd, .. } => Some(rd),
            Instruction::S { .. } | Instruction::B { .. } => None,
        }
    }

    pub fn rs1(&self) -> Option<u8> {
        match *self {
            Instruction::R { rs1, .. }
            | Instruction::I { rs1, .. }
            | Instruction::S { rs1, .. }
            | Instruction::B { rs1, .. } => Some(rs1),
            Instruction::U { .. } | Instruction::J { .. } => None,
        }
    }

    pub fn rs2(&self) -> Option<u8> {
        match *self {
            Instruction::R { rs2, .. } | Instruction::S { rs2, .. } | Instruction::B { rs2, .. } => {
                Some(rs2)
            }
            Instruction::I { .. } | Instruction::U { .. } | Instruction::J { .. } => None,
        }
    }

    pub fn imm(&self) -> Option<i32> {
        match *self {
            Instruction::I { imm, .. }
            | Instruction::S { imm, .. }
            | Instruction::B { imm, .. }
            | Instruction::U { imm, .. }
            | Instruction::J { imm, .. } => Some(imm),
            Instruction::R { .. } => None,
        }
    }

    pub fn funct3(&self) -> Option<u8> {
        match *self {
            Instruction::R { funct3, .. }
            | Instruction::I { funct3, .. }
            | Instruction::S { funct3, .. }
            | Instruction::B { funct3, .. } => Some(funct3),
            Instruction::U { .. } | Instruction::J { .. } => None,
        }
    }

    pub fn funct7(&self) -> Option<u8> {
        match *self {
            Instruction::R { funct7, .. } => Some(funct7),
            _ => None,
        }
    }

    /// Shift amount of slli/srli/srai, the low five bits of the immediate.
    pub fn shamt(&self) -> Option<u8> {
        match *self {
            Instruction::I {
                op: Operation::Slli | Operation::Srli | Operation::Srai,
                imm,
                ..
            } => Some((imm & 0x1F) as u8),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::R {
                op, rd, rs1, rs2, ..
            } => write!(f, "{op} x{rd}, x{rs1}, x{rs2}"),
            Instruction::I { op, rd, rs1, imm, .. } if op.is_load() || op == Operation::Jalr => {
                write!(f, "{op} x{rd}, {imm}(x{rs1})")
            }
            Instruction::I { op, rd, rs1, imm, .. } => match self.shamt() {
                Some(shamt) => write!(f, "{op} x{rd}, x{rs1}, {shamt}"),
                None => write!(f, "{op} x{rd}, x{rs1}, {imm}"),
            },
            Instruction::S {
                op, rs1, rs2, imm, ..
            } => write!(f, "{op} x{rs2}, {imm}(x{rs1})"),
            Instruction::B {
                op, rs1, rs2, imm, ..
            } => write!(f, "{op} x{rs1}, x{rs2}, {imm}"),
            Instruction::U { op, rd, imm } => write!(f, "{op} x{rd}, {:#x}", (imm as u32) >> 12),
            Instruction::J { op, rd, imm } => write!(f, "{op} x{rd}, {imm}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_format() {
        let store = Instruction::S {
            op: Operation::Sw,
            rs1: 2,
            rs2: 8,
            funct3: 0b010,
            imm: 24,
        };
        assert_eq!(store.format(), Format::S);
        assert_eq!(store.rd(), None);
        assert_eq!(store.rs1(), Some(2));
        assert_eq!(store.rs2(), Some(8));
        assert_eq!(store.imm(), Some(24));
        assert_eq!(store.funct7(), None);

        let jal = Instruction::J {
            op: Operation::Jal,
            rd: 1,
            imm: -8,
        };
        assert_eq!(jal.rs1(), None);
        assert_eq!(jal.funct3(), None);
        assert_eq!(jal.rd(), Some(1));
    }

    #[test]
    fn test_shamt() {
        let srai = Instruction::I {
            op: Operation::Srai,
            rd: 1,
            rs1: 2,
            funct3: 0b101,
            imm: 0x405,
        };
        assert_eq!(srai.shamt(), Some(5));

        let addi = Instruction::I {
            op: Operation::Addi,
            rd: 1,
            rs1: 2,
            funct3: 0b000,
            imm: 5,
        };
        assert_eq!(addi.shamt(), None);
    }

    #[test]
    fn test_display() {
        let lw = Instruction::I {
            op: Operation::Lw,
            rd: 4,
            rs1: 0,
            funct3: 0b010,
            imm: 0,
        };
        assert_eq!(lw.to_string(), "lw x4, 0(x0)");

        let sub = Instruction::R {
            op: Operation::Sub,
            rd: 3,
            rs1: 1,
            rs2: 2,
            funct3: 0,
            funct7: 0x20,
        };
        assert_eq!(sub.to_string(), "sub x3, x1, x2");

        let lui = Instruction::U {
            op: Operation::Lui,
            rd: 5,
            imm: 0x1234_5000,
        };
        assert_eq!(lui.to_string(), "lui x5, 0x12345");

        let beq = Instruction::B {
            op: Operation::Beq,
            rs1: 1,
            rs2: 2,
            funct3: 0,
            imm: -4,
        };
        assert_eq!(beq.to_string(), "beq x1, x2, -4");
    }
}
