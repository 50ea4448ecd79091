#![allow(clippy::unusual_byte_groupings)]

pub mod alu;
pub mod config;
pub mod control;
pub mod decoder;
#[cfg(test)]
mod encoder;
pub mod error;
pub mod instruction;
pub mod loader;
pub mod pipeline;
pub mod registers;
pub mod snapshot;
pub mod system_interface;
mod utils;

use log::{debug, info, warn};

pub use config::{InitialState, Preset, SystemConfig};
pub use error::{ConfigError, DecodeError, ExecutionError, LoadError};
pub use instruction::{Format, Instruction, Operation};
pub use registers::RegisterFile;
pub use snapshot::CycleReport;

use pipeline::{
    PipelineStage, Stage,
    decode::{InstructionDecode, InstructionDecodeParams},
    execute::{InstructionExecute, InstructionExecuteParams},
    fetch::{InstructionFetch, InstructionFetchParams},
    memory_access::{InstructionMemoryAccess, InstructionMemoryAccessParams},
    write_back::{InstructionWriteBack, InstructionWriteBackParams},
};
use snapshot::Snapshot;
use system_interface::{RamDevice, RomDevice, SystemInterface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
}

/// Single-cycle RV32I datapath. Every call to `cycle` runs one instruction
/// through all stages and commits its effects.
pub struct RV32ISystem {
    pub bus: SystemInterface,
    pub reg_file: RegisterFile,
    pc: u32,
    cycles: u64,
    config: SystemConfig,
    stage_if: InstructionFetch,
    stage_de: InstructionDecode,
    stage_ex: InstructionExecute,
    stage_ma: InstructionMemoryAccess,
    stage_wb: InstructionWriteBack,
}

impl RV32ISystem {
    pub fn new() -> Self {
        Self::build(SystemConfig::default())
    }

    pub fn with_config(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SystemConfig) -> Self {
        let rom = RomDevice::new();
        let ram = RamDevice::new(config.memory_words);

        Self {
            bus: SystemInterface::new(rom, ram),
            reg_file: RegisterFile::new(),
            pc: 0,
            cycles: 0,
            config,
            stage_if: InstructionFetch::new(),
            stage_de: InstructionDecode::new(),
            stage_ex: InstructionExecute::new(),
            stage_ma: InstructionMemoryAccess::new(),
            stage_wb: InstructionWriteBack::new(),
        }
    }

    /// Installs a program at address 0 and rewinds pc and the cycle count.
    /// Words past `max_program_len` are dropped; returns whether any were.
    pub fn load_program(&mut self, mut words: Vec<u32>) -> bool {
        let truncated = words.len() > self.config.max_program_len;
        if truncated {
            warn!(
                "program has {} instructions, only the first {} are loaded",
                words.len(),
                self.config.max_program_len
            );
            words.truncate(self.config.max_program_len);
        }
        self.bus.rom.load(words);
        self.pc = 0;
        self.cycles = 0;
        truncated
    }

    pub fn initialize(&mut self, state: &InitialState) -> Result<(), ConfigError> {
        state.apply(&mut self.reg_file, &mut self.bus.ram)
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.reg_file
    }

    pub fn memory(&self) -> &[u32] {
        self.bus.ram.words()
    }

    pub fn is_finished(&self) -> bool {
        (self.pc / 4) as usize >= self.bus.rom.len()
    }

    fn step(&mut self, stage: Stage) -> Result<(), ExecutionError> {
        match stage {
            Stage::Fetch => {
                self.stage_if.compute(InstructionFetchParams {
                    pc: self.pc,
                    bus: &self.bus,
                })?;
                self.stage_if.latch_next();
            }
            Stage::Decode => {
                self.stage_de.compute(InstructionDecodeParams {
                    instruction_in: self.stage_if.get_instruction_out(),
                    reg_file: &self.reg_file,
                })?;
                self.stage_de.latch_next();
            }
            Stage::Execute => {
                self.stage_ex.compute(InstructionExecuteParams {
                    decoded_instruction_in: self.stage_de.get_decoded_instruction_out(),
                })?;
                self.stage_ex.latch_next();
            }
            Stage::MemoryAccess => {
                self.stage_ma.compute(InstructionMemoryAccessParams {
                    execution_value_in: self.stage_ex.get_execution_value_out(),
                    bus: &mut self.bus,
                })?;
                self.stage_ma.latch_next();
            }
            Stage::WriteBack => {
                self.stage_wb.compute(InstructionWriteBackParams {
                    memory_access_value_in: self.stage_ma.get_memory_access_value_out(),
                    reg_file: &mut self.reg_file,
                })?;
                self.stage_wb.latch_next();
            }
            Stage::UpdatePc => {
                self.pc = self.stage_ma.get_memory_access_value_out().next_pc;
            }
        }
        Ok(())
    }

    fn reset_stages(&mut self) {
        self.stage_if.reset();
        self.stage_de.reset();
        self.stage_ex.reset();
        self.stage_ma.reset();
        self.stage_wb.reset();
    }

    /// Runs one instruction. Fetch, decode and execute fail before memory or
    /// registers are touched, so an error leaves the machine as it was.
    pub fn cycle(&mut self) -> Result<CycleReport, ExecutionError> {
        let before = Snapshot::capture(&self.reg_file, &self.bus.ram, self.pc);
        self.reset_stages();

        let mut stage = Some(Stage::Fetch);
        while let Some(current) = stage {
            self.step(current)?;
            stage = current.next();
        }
        self.cycles += 1;

        let after = Snapshot::capture(&self.reg_file, &self.bus.ram, self.pc);
        let fault = self.stage_ma.get_memory_access_value_out().fault;
        let report = before.diff(&after, self.cycles, fault);
        debug!("cycle {}: pc {:#x} -> {:#x}", self.cycles, before.pc, self.pc);
        Ok(report)
    }

    /// Cycles until pc leaves the program, handing each report to `on_cycle`.
    pub fn run_with<F>(&mut self, mut on_cycle: F) -> Result<RunSummary, ExecutionError>
    where
        F: FnMut(&CycleReport),
    {
        while !self.is_finished() {
            if self.cycles >= self.config.max_cycles {
                warn!("stopping at pc {:#x} after {} cycles", self.pc, self.cycles);
                return Err(ExecutionError::RunawayExecution {
                    limit: self.config.max_cycles,
                });
            }
            let report = self.cycle()?;
            on_cycle(&report);
        }

        info!("program terminated after {} cycles", self.cycles);
        Ok(RunSummary {
            cycles: self.cycles,
        })
    }

    pub fn run(&mut self) -> Result<RunSummary, ExecutionError> {
        self.run_with(|_| {})
    }
}

impl Default for RV32ISystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{Access, MemoryError},
        system_interface::MMIODevice,
    };

    #[test]
    fn test_instructions() {
        let mut rv = RV32ISystem::new();
        rv.load_program(vec![
            0b000000000101_00000_000_00001_0010011,  // addi x1, x0, 5
            0b000000000011_00000_000_00010_0010011,  // addi x2, x0, 3
            0b0000000_00010_00001_000_00011_0110011, // add x3, x1, x2
            0b0000000_00011_00000_010_00000_0100011, // sw x3, 0(x0)
            0b000000000000_00000_010_00100_0000011,  // lw x4, 0(x0)
        ]);

        let report = rv.cycle().unwrap();
        assert_eq!(report.cycle, 1);
        assert_eq!(report.register(1), Some(5));
        assert_eq!(report.pc, 4);

        rv.cycle().unwrap();
        assert_eq!(rv.reg_file.read(2), Ok(3));

        let report = rv.cycle().unwrap();
        assert_eq!(report.register(3), Some(8));

        let report = rv.cycle().unwrap();
        assert!(report.registers.is_empty());
        assert_eq!(report.memory_at(0x0), Some(8));

        let report = rv.cycle().unwrap();
        assert_eq!(report.register(4), Some(8));
        assert_eq!(rv.pc(), 20);
        assert_eq!(rv.cycles(), 5);
        assert!(rv.is_finished());
    }

    #[test]
    fn test_stage_latches() {
        let mut rv = RV32ISystem::new();
        rv.reg_file.write(1, 0x0102_0304).unwrap();
        rv.load_program(vec![0b000000000001_00001_000_00011_0010011]); // addi x3, x1, 1

        rv.cycle().unwrap();
        assert_eq!(
            rv.stage_if.get_instruction_out().instruction,
            0b000000000001_00001_000_00011_0010011
        );
        assert_eq!(rv.stage_de.get_decoded_instruction_out().rs1, 0x0102_0304);
        assert_eq!(rv.stage_ex.get_execution_value_out().alu_result, 0x0102_0305);
        assert_eq!(rv.stage_ma.get_memory_access_value_out().next_pc, 4);
        assert_eq!(rv.stage_wb.get_written_out(), Some((3, 0x0102_0305)));
    }

    #[test]
    fn test_x0_stays_zero() {
        let mut rv = RV32ISystem::new();
        rv.load_program(vec![0b000000000111_00000_000_00000_0010011]); // addi x0, x0, 7

        let report = rv.cycle().unwrap();
        assert!(report.registers.is_empty());
        assert_eq!(rv.reg_file.read(0), Ok(0));
        assert_eq!(rv.pc(), 4);
    }

    #[test]
    fn test_fetch_past_end() {
        let mut rv = RV32ISystem::new();
        rv.load_program(vec![
            0b000000000101_00000_000_00001_0010011, // addi x1, x0, 5
            0b000000000011_00000_000_00010_0010011, // addi x2, x0, 3
        ]);

        rv.cycle().unwrap();
        rv.cycle().unwrap();
        assert!(rv.is_finished());
        assert_eq!(
            rv.cycle(),
            Err(ExecutionError::FetchOutOfBounds {
                pc: 8,
                program_len: 2,
            })
        );
        assert_eq!(rv.cycles(), 2);
    }

    #[test]
    fn test_illegal_instruction_changes_nothing() {
        let mut rv = RV32ISystem::new();
        rv.load_program(vec![0b000000000000_00000_000_00000_1110011]); // ecall

        assert_eq!(
            rv.cycle(),
            Err(ExecutionError::IllegalInstruction {
                pc: 0,
                source: DecodeError::UnknownOpcode {
                    word: 0x0000_0073,
                    opcode: 0b1110011,
                },
            })
        );
        assert_eq!(rv.pc(), 0);
        assert_eq!(rv.cycles(), 0);
        assert_eq!(rv.reg_file, RegisterFile::new());
    }

    #[test]
    fn test_run_loop() {
        let mut rv = RV32ISystem::new();
        rv.load_program(vec![
            0b000000000100_00000_000_00001_0010011,     // addi x1, x0, 4
            0b000000000000_00000_000_00010_0010011,     // addi x2, x0, 0
            0b0000000_00001_00010_000_00010_0110011,    // add x2, x2, x1
            0b111111111111_00001_000_00001_0010011,     // addi x1, x1, -1
            0b1_111111_00000_00001_001_1100_1_1100011,  // bne x1, x0, -8
            0b0000000_00010_00000_010_00100_0100011,    // sw x2, 4(x0)
        ]);

        let mut reports = Vec::new();
        let summary = rv.run_with(|report| reports.push(report.clone())).unwrap();
        assert_eq!(summary, RunSummary { cycles: 15 });
        assert_eq!(reports.len(), 15);
        assert_eq!(rv.reg_file.read(1), Ok(0));
        assert_eq!(rv.reg_file.read(2), Ok(10));
        assert_eq!(rv.memory()[1], 10);
        assert_eq!(reports[14].memory_at(0x4), Some(10));
    }

    #[test]
    fn test_runaway_execution() {
        let mut rv = RV32ISystem::with_config(SystemConfig {
            max_cycles: 10,
            ..Default::default()
        })
        .unwrap();
        rv.load_program(vec![0b0_000000_00000_00000_000_0000_0_1100011]); // beq x0, x0, 0

        assert_eq!(
            rv.run(),
            Err(ExecutionError::RunawayExecution { limit: 10 })
        );
        assert_eq!(rv.cycles(), 10);
        assert_eq!(rv.pc(), 0);
    }

    #[test]
    fn test_out_of_bounds_load_is_skipped() {
        let mut rv = RV32ISystem::new();
        rv.reg_file.write(4, 0x1234).unwrap();
        rv.load_program(vec![0b000010000000_00000_010_00100_0000011]); // lw x4, 0x80(x0)

        let report = rv.cycle().unwrap();
        assert_eq!(
            report.fault,
            Some(MemoryError::OutOfBounds {
                access: Access::Read,
                address: 0x80,
                capacity: 32,
            })
        );
        assert!(report.registers.is_empty());
        assert_eq!(rv.reg_file.read(4), Ok(0x1234));
        assert_eq!(rv.pc(), 4);
    }

    #[test]
    fn test_initialize_and_config() {
        let mut rv = RV32ISystem::with_config(SystemConfig {
            memory_words: 64,
            max_program_len: 1,
            ..Default::default()
        })
        .unwrap();
        rv.initialize(&InitialState::from_preset(Preset::Sample1))
            .unwrap();
        assert_eq!(rv.memory().len(), 64);
        assert_eq!(rv.bus.ram.read_word(0x74), Ok(0x10));
        assert_eq!(rv.registers().read(10), Ok(0x70));

        assert!(rv.load_program(vec![0x0050_0093, 0x0030_0113]));
        assert_eq!(rv.bus.rom.len(), 1);
        assert!(!rv.load_program(vec![0x0050_0093]));
        assert_eq!(rv.run(), Ok(RunSummary { cycles: 1 }));
    }

    #[test]
    fn test_oversized_memory_is_rejected() {
        let config = SystemConfig {
            memory_words: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(
            RV32ISystem::with_config(config),
            Err(ConfigError::MemoryTooLarge { .. })
        ));
    }

    #[test]
    fn test_empty_program() {
        let mut rv = RV32ISystem::new();
        assert!(rv.is_finished());
        assert_eq!(rv.run(), Ok(RunSummary { cycles: 0 }));
    }
}
