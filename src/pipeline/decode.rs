use super::{PipelineStage, fetch::InstructionValue};
use crate::{
    control::{ControlSignals, control_signals},
    decoder::decode,
    error::ExecutionError,
    instruction::Instruction,
    registers::RegisterFile,
    utils::LatchValue,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub instruction: Option<Instruction>,
    pub signals: ControlSignals,
    pub rd: u8,
    pub rs1: u32,
    pub rs2: u32,
    pub imm32: i32,
    pub pc: u32,
    pub pc_plus_4: u32,
}

pub struct InstructionDecode {
    instruction: LatchValue<DecodedInstruction>,
}

pub struct InstructionDecodeParams<'a> {
    pub instruction_in: InstructionValue,
    pub reg_file: &'a RegisterFile,
}

impl InstructionDecode {
    pub fn new() -> Self {
        Self {
            instruction: LatchValue::new(DecodedInstruction::default()),
        }
    }

    pub fn get_decoded_instruction_out(&self) -> DecodedInstruction {
        *self.instruction.get()
    }
}

impl Default for InstructionDecode {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PipelineStage<InstructionDecodeParams<'a>> for InstructionDecode {
    fn compute(&mut self, params: InstructionDecodeParams<'a>) -> Result<(), ExecutionError> {
        let fetched = params.instruction_in;
        let illegal = |source| ExecutionError::IllegalInstruction {
            pc: fetched.pc,
            source,
        };

        let instruction = decode(fetched.instruction).map_err(illegal)?;
        let signals = control_signals(&instruction).map_err(illegal)?;
        log::trace!("decode {:#x}: {} {:?}", fetched.pc, instruction, signals);

        let read = |index: Option<u8>| {
            index.map_or(Ok(0), |index| params.reg_file.read(index)).map_err(|source| {
                ExecutionError::Register {
                    pc: fetched.pc,
                    source,
                }
            })
        };

        self.instruction.set(DecodedInstruction {
            instruction: Some(instruction),
            signals,
            rd: instruction
                .rd()
                .map_or(Ok(0), |rd| RegisterFile::validate(rd).map(|_| rd))
                .map_err(|source| ExecutionError::Register {
                    pc: fetched.pc,
                    source,
                })?,
            rs1: read(instruction.rs1())?,
            rs2: read(instruction.rs2())?,
            imm32: instruction.imm().unwrap_or(0),
            pc: fetched.pc,
            pc_plus_4: fetched.pc_plus_4,
        });
        Ok(())
    }

    fn latch_next(&mut self) {
        self.instruction.latch_next();
    }

    fn reset(&mut self) {
        self.instruction.reset();
    }
}
