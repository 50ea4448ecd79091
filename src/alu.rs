use crate::error::AluError;

pub const ALU_OPERATION_AND: u8 = 0b0000;
pub const ALU_OPERATION_OR: u8 = 0b0001;
pub const ALU_OPERATION_ADD: u8 = 0b0010;
pub const ALU_OPERATION_XOR: u8 = 0b0011;
pub const ALU_OPERATION_SLL: u8 = 0b0100;
pub const ALU_OPERATION_SRL: u8 = 0b0101;
pub const ALU_OPERATION_SUB: u8 = 0b0110;
pub const ALU_OPERATION_SRA: u8 = 0b0111;
pub const ALU_OPERATION_SLT: u8 = 0b1000;
pub const ALU_OPERATION_SLTU: u8 = 0b1001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AluOp {
    And,
    Or,
    #[default]
    Add,
    Sub,
    Xor,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,
}

impl AluOp {
    /// 4-bit ALU control code driven by the control unit.
    pub fn code(&self) -> u8 {
        match self {
            AluOp::And => ALU_OPERATION_AND,
            AluOp::Or => ALU_OPERATION_OR,
            AluOp::Add => ALU_OPERATION_ADD,
            AluOp::Xor => ALU_OPERATION_XOR,
            AluOp::Sll => ALU_OPERATION_SLL,
            AluOp::Srl => ALU_OPERATION_SRL,
            AluOp::Sub => ALU_OPERATION_SUB,
            AluOp::Sra => ALU_OPERATION_SRA,
            AluOp::Slt => ALU_OPERATION_SLT,
            AluOp::Sltu => ALU_OPERATION_SLTU,
        }
    }
}

impl TryFrom<u8> for AluOp {
    type Error = AluError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            ALU_OPERATION_AND => Ok(AluOp::And),
            ALU_OPERATION_OR => Ok(AluOp::Or),
            ALU_OPERATION_ADD => Ok(AluOp::Add),
            ALU_OPERATION_XOR => Ok(AluOp::Xor),
            ALU_OPERATION_SLL => Ok(AluOp::Sll),
            ALU_OPERATION_SRL => Ok(AluOp::Srl),
            ALU_OPERATION_SUB => Ok(AluOp::Sub),
            ALU_OPERATION_SRA => Ok(AluOp::Sra),
            ALU_OPERATION_SLT => Ok(AluOp::Slt),
            ALU_OPERATION_SLTU => Ok(AluOp::Sltu),
            _ => Err(AluError::UnknownOperation(code)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AluOutput {
    pub result: u32,
    pub zero: bool,
}

/// Two's-complement 32-bit ALU. Shifts use the low five bits of `b`.
pub fn execute(a: u32, b: u32, op: AluOp) -> AluOutput {
    let shamt = b & 0x1F;
    let result = match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Xor => a ^ b,
        AluOp::Sll => a << shamt,
        AluOp::Srl => a >> shamt,
        AluOp::Sra => ((a as i32) >> shamt) as u32,
        AluOp::Slt => ((a as i32) < (b as i32)).into(),
        AluOp::Sltu => (a < b).into(),
    };

    AluOutput {
        result,
        zero: result == 0,
    }
}

/// Runs the ALU from a raw control code, rejecting codes it does not implement.
pub fn execute_code(a: u32, b: u32, code: u8) -> Result<AluOutput, AluError> {
    Ok(execute(a, b, AluOp::try_from(code)?))
}
