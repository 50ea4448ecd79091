use super::{PipelineStage, execute::ExecutionValue};
use crate::{
    control::{ControlSignals, MemWidth},
    error::{ExecutionError, MemoryError},
    system_interface::{MMIODevice, RamDevice, SystemInterface},
    utils::LatchValue,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAccessValue {
    pub pc: u32,
    pub alu_result: u32,
    pub mem_data: u32,
    pub rd: u8,
    pub signals: ControlSignals,
    pub next_pc: u32,
    /// A skipped access. A faulted load also suppresses its register write.
    pub fault: Option<MemoryError>,
}

pub struct InstructionMemoryAccess {
    value: LatchValue<MemoryAccessValue>,
}

pub struct InstructionMemoryAccessParams<'a> {
    pub execution_value_in: ExecutionValue,
    pub bus: &'a mut SystemInterface,
}

impl InstructionMemoryAccess {
    pub fn new() -> Self {
        Self {
            value: LatchValue::new(MemoryAccessValue::default()),
        }
    }

    pub fn get_memory_access_value_out(&self) -> MemoryAccessValue {
        *self.value.get()
    }
}

impl Default for InstructionMemoryAccess {
    fn default() -> Self {
        Self::new()
    }
}

fn load(ram: &RamDevice, address: u32, width: MemWidth) -> Result<u32, MemoryError> {
    Ok(match width {
        MemWidth::Word => ram.read_word(address)?,
        MemWidth::Half => ram.read_half_word(address)? as i16 as i32 as u32,
        MemWidth::Byte => ram.read_byte(address)? as i8 as i32 as u32,
    })
}

fn store(ram: &mut RamDevice, address: u32, value: u32, width: MemWidth) -> Result<(), MemoryError> {
    match width {
        MemWidth::Word => ram.write_word(address, value),
        MemWidth::Half => ram.write_half_word(address, value as u16),
        MemWidth::Byte => ram.write_byte(address, value as u8),
    }
}

impl<'a> PipelineStage<InstructionMemoryAccessParams<'a>> for InstructionMemoryAccess {
    fn compute(&mut self, params: InstructionMemoryAccessParams<'a>) -> Result<(), ExecutionError> {
        let execution_value = params.execution_value_in;
        let signals = execution_value.signals;
        let address = execution_value.alu_result;

        let mut mem_data = 0;
        let mut fault = None;

        if signals.mem_read {
            match load(&params.bus.ram, address, signals.mem_width) {
                Ok(value) => mem_data = value,
                Err(error) => fault = Some(error),
            }
        }

        if signals.mem_write {
            if let Err(error) = store(
                &mut params.bus.ram,
                address,
                execution_value.rs2,
                signals.mem_width,
            ) {
                fault = Some(error);
            }
        }

        if let Some(error) = &fault {
            log::warn!("{error}, access skipped");
        }

        self.value.set(MemoryAccessValue {
            pc: execution_value.pc,
            alu_result: execution_value.alu_result,
            mem_data,
            rd: execution_value.rd,
            signals,
            next_pc: execution_value.next_pc,
            fault,
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
