use super::PipelineStage;
use crate::{
    error::ExecutionError,
    system_interface::{MMIODevice, SystemInterface},
    utils::LatchValue,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InstructionValue {
    pub instruction: u32,
    pub pc: u32,
    pub pc_plus_4: u32,
}

pub struct InstructionFetch {
    instruction: LatchValue<InstructionValue>,
}

pub struct InstructionFetchParams<'a> {
    pub pc: u32,
    pub bus: &'a SystemInterface,
}

impl InstructionFetch {
    pub fn new() -> Self {
        Self {
            instruction: LatchValue::new(InstructionValue::default()),
        }
    }

    pub fn get_instruction_out(&self) -> InstructionValue {
        *self.instruction.get()
    }
}

impl Default for InstructionFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PipelineStage<InstructionFetchParams<'a>> for InstructionFetch {
    fn compute(&mut self, params: InstructionFetchParams<'a>) -> Result<(), ExecutionError> {
        let instruction = params.bus.rom.read_word(params.pc).map_err(|_| {
            ExecutionError::FetchOutOfBounds {
                pc: params.pc,
                program_len: params.bus.rom.len(),
            }
        })?;
        log::trace!("fetch {:#010x} from pc {:#x}", instruction, params.pc);

        self.instruction.set(InstructionValue {
            instruction,
            pc: params.pc,
            pc_plus_4: params.pc.wrapping_add(4),
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
