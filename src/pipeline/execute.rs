use super::{PipelineStage, decode::DecodedInstruction};
use crate::{
    alu::{self, AluOutput},
    control::{BranchCondition, ControlSignals, Jump, OperandA, OperandB},
    error::ExecutionError,
    utils::LatchValue,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionValue {
    pub pc: u32,
    pub alu_result: u32,
    pub zero: bool,
    pub rd: u8,
    pub rs2: u32,
    pub signals: ControlSignals,
    pub branch_taken: bool,
    pub next_pc: u32,
}

pub struct InstructionExecute {
    value: LatchValue<ExecutionValue>,
}

pub struct InstructionExecuteParams {
    pub decoded_instruction_in: DecodedInstruction,
}

impl InstructionExecute {
    pub fn new() -> Self {
        Self {
            value: LatchValue::new(ExecutionValue::default()),
        }
    }

    pub fn get_execution_value_out(&self) -> ExecutionValue {
        *self.value.get()
    }
}

impl Default for InstructionExecute {
    fn default() -> Self {
        Self::new()
    }
}

fn branch_taken(condition: BranchCondition, out: AluOutput, rs1: u32, rs2: u32) -> bool {
    match condition {
        BranchCondition::Eq => out.zero,
        BranchCondition::Ne => !out.zero,
        BranchCondition::Lt => (rs1 as i32) < (rs2 as i32),
        BranchCondition::Ge => (rs1 as i32) >= (rs2 as i32),
    }
}

impl PipelineStage<InstructionExecuteParams> for InstructionExecute {
    fn compute(&mut self, params: InstructionExecuteParams) -> Result<(), ExecutionError> {
        let decoded = params.decoded_instruction_in;
        let signals = decoded.signals;

        let operand_a = match signals.alu_a {
            OperandA::Register => decoded.rs1,
            OperandA::Pc => decoded.pc,
            OperandA::Zero => 0,
        };
        let operand_b = match signals.alu_src {
            OperandB::Register => decoded.rs2,
            OperandB::Immediate => decoded.imm32 as u32,
        };

        let out = alu::execute_code(operand_a, operand_b, signals.alu_control).map_err(|source| {
            ExecutionError::Alu {
                pc: decoded.pc,
                source,
            }
        })?;

        let branch_target = decoded.pc.wrapping_add_signed(decoded.imm32);
        let taken = signals.branch && branch_taken(signals.branch_condition, out, decoded.rs1, decoded.rs2);

        let (alu_result, next_pc) = match signals.jump {
            Jump::Relative => (decoded.pc_plus_4, branch_target),
            Jump::Register => (
                decoded.pc_plus_4,
                decoded.rs1.wrapping_add_signed(decoded.imm32) & !1,
            ),
            Jump::None if taken => (out.result, branch_target),
            Jump::None => (out.result, decoded.pc_plus_4),
        };

        if next_pc & 0b11 != 0 {
            return Err(ExecutionError::MisalignedTarget {
                pc: decoded.pc,
                target: next_pc,
            });
        }
        log::trace!(
            "execute {:#x}: alu {:#x} (zero={}), next pc {:#x}",
            decoded.pc,
            alu_result,
            out.zero,
            next_pc
        );

        self.value.set(ExecutionValue {
            pc: decoded.pc,
            alu_result,
            zero: out.zero,
            rd: decoded.rd,
            rs2: decoded.rs2,
            signals,
            branch_taken: taken,
            next_pc,
        });
        Ok(())
    }

    fn latch_next(&mut self) {
        self.value.latch_next();
    }

    fn reset(&mut self) {
        self.value.reset();
    }
}
