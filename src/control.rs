use crate::{
    alu::AluOp,
    error::DecodeError,
    instruction::{Instruction, Operation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandA {
    #[default]
    Register,
    Pc,
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandB {
    #[default]
    Register,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteBackSource {
    #[default]
    Alu,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchCondition {
    #[default]
    Eq,
    Ne,
    Lt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jump {
    #[default]
    None,
    /// jal: pc + imm
    Relative,
    /// jalr: (rs1 + imm) & !1
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemWidth {
    #[default]
    Word,
    Half,
    Byte,
}

/// Datapath control lines for one instruction. `Default` is the reset value
/// with every enable cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlSignals {
    pub reg_write: bool,
    pub mem_read: bool,
    pub mem_write: bool,
    pub branch: bool,
    pub alu_src: OperandB,
    pub alu_a: OperandA,
    pub mem_to_reg: WriteBackSource,
    /// 4-bit ALU control code, see [`crate::alu`].
    pub alu_control: u8,
    pub branch_condition: BranchCondition,
    pub jump: Jump,
    pub mem_width: MemWidth,
}

fn alu(op: AluOp, alu_src: OperandB) -> ControlSignals {
    ControlSignals {
        reg_write: true,
        alu_src,
        alu_control: op.code(),
        ..Default::default()
    }
}

fn load(mem_width: MemWidth) -> ControlSignals {
    ControlSignals {
        reg_write: true,
        mem_read: true,
        alu_src: OperandB::Immediate,
        mem_to_reg: WriteBackSource::Memory,
        alu_control: AluOp::Add.code(),
        mem_width,
        ..Default::default()
    }
}

fn store(mem_width: MemWidth) -> ControlSignals {
    ControlSignals {
        mem_write: true,
        alu_src: OperandB::Immediate,
        alu_control: AluOp::Add.code(),
        mem_width,
        ..Default::default()
    }
}

fn branch(branch_condition: BranchCondition) -> ControlSignals {
    ControlSignals {
        branch: true,
        alu_src: OperandB::Register,
        alu_control: AluOp::Sub.code(),
        branch_condition,
        ..Default::default()
    }
}

fn jump(jump: Jump) -> ControlSignals {
    ControlSignals {
        reg_write: true,
        alu_src: OperandB::Immediate,
        alu_control: AluOp::Add.code(),
        jump,
        ..Default::default()
    }
}

fn upper(alu_a: OperandA) -> ControlSignals {
    ControlSignals {
        reg_write: true,
        alu_src: OperandB::Immediate,
        alu_a,
        alu_control: AluOp::Add.code(),
        ..Default::default()
    }
}

fn unknown_operation(instruction: &Instruction) -> DecodeError {
    let funct7 = match *instruction {
        Instruction::R { funct7, .. } => funct7,
        Instruction::I { imm, .. } => (((imm as u32) >> 5) & 0x7F) as u8,
        _ => 0,
    };
    DecodeError::UnknownOperation {
        format: instruction.format(),
        funct3: instruction.funct3().unwrap_or(0),
        funct7,
    }
}

/// Derives the control signals for a decoded instruction. An instruction whose
/// operation is [`Operation::Unknown`] has no signals and is rejected.
pub fn control_signals(instruction: &Instruction) -> Result<ControlSignals, DecodeError> {
    use OperandB::{Immediate, Register};

    Ok(match instruction.operation() {
        Operation::Add => alu(AluOp::Add, Register),
        Operation::Sub => alu(AluOp::Sub, Register),
        Operation::And => alu(AluOp::And, Register),
        Operation::Or => alu(AluOp::Or, Register),
        Operation::Xor => alu(AluOp::Xor, Register),
        Operation::Sll => alu(AluOp::Sll, Register),
        Operation::Srl => alu(AluOp::Srl, Register),
        Operation::Sra => alu(AluOp::Sra, Register),
        Operation::Slt => alu(AluOp::Slt, Register),
        Operation::Sltu => alu(AluOp::Sltu, Register),
        Operation::Addi => alu(AluOp::Add, Immediate),
        Operation::Andi => alu(AluOp::And, Immediate),
        Operation::Ori => alu(AluOp::Or, Immediate),
        Operation::Xori => alu(AluOp::Xor, Immediate),
        Operation::Slti => alu(AluOp::Slt, Immediate),
        Operation::Sltiu => alu(AluOp::Sltu, Immediate),
        Operation::Slli => alu(AluOp::Sll, Immediate),
        Operation::Srli => alu(AluOp::Srl, Immediate),
        Operation::Srai => alu(AluOp::Sra, Immediate),
        Operation::Lb => load(MemWidth::Byte),
        Operation::Lh => load(MemWidth::Half),
        Operation::Lw => load(MemWidth::Word),
        Operation::Sb => store(MemWidth::Byte),
        Operation::Sh => store(MemWidth::Half),
        Operation::Sw => store(MemWidth::Word),
        Operation::Beq => branch(BranchCondition::Eq),
        Operation::Bne => branch(BranchCondition::Ne),
        Operation::Blt => branch(BranchCondition::Lt),
        Operation::Bge => branch(BranchCondition::Ge),
        Operation::Jal => jump(Jump::Relative),
        Operation::Jalr => jump(Jump::Register),
        Operation::Lui => upper(OperandA::Zero),
        Operation::Auipc => upper(OperandA::Pc),
        Operation::Unknown => return Err(unknown_operation(instruction)),
    })
}
