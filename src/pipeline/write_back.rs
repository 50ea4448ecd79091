use super::{PipelineStage, memory_access::MemoryAccessValue};
use crate::{
    control::WriteBackSource, error::ExecutionError, registers::RegisterFile, utils::LatchValue,
};

pub struct InstructionWriteBack {
    written: LatchValue<Option<(u8, u32)>>,
}

pub struct InstructionWriteBackParams<'a> {
    pub memory_access_value_in: MemoryAccessValue,
    pub reg_file: &'a mut RegisterFile,
}

impl InstructionWriteBack {
    pub fn new() -> Self {
        Self {
            written: LatchValue::new(None),
        }
    }

    pub fn get_written_out(&self) -> Option<(u8, u32)> {
        *self.written.get()
    }
}

impl Default for InstructionWriteBack {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PipelineStage<InstructionWriteBackParams<'a>> for InstructionWriteBack {
    fn compute(&mut self, params: InstructionWriteBackParams<'a>) -> Result<(), ExecutionError> {
        let memory_access_value = params.memory_access_value_in;
        let signals = memory_access_value.signals;
        let load_faulted = signals.mem_read && memory_access_value.fault.is_some();

        if !signals.reg_write || load_faulted || memory_access_value.rd == 0 {
            self.written.set(None);
            return Ok(());
        }

        let value = match signals.mem_to_reg {
            WriteBackSource::Alu => memory_access_value.alu_result,
            WriteBackSource::Memory => memory_access_value.mem_data,
        };
        params
            .reg_file
            .write(memory_access_value.rd, value)
            .map_err(|source| ExecutionError::Register {
                pc: memory_access_value.pc,
                source,
            })?;
        log::trace!("write back x{} = {:#x}", memory_access_value.rd, value);
        self.written.set(Some((memory_access_value.rd, value)));
        Ok(())
    }

    fn latch_next(&mut self) {
        self.written.latch_next();
    }

    fn reset(&mut self) {
        self.written.reset();
    }
}
