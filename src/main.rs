use std::{error::Error, path::PathBuf};

use clap::Parser;
use riscv_datapath::{
    InitialState, Instruction, Preset, RV32ISystem, SystemConfig, decoder,
    loader::load_program_file,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program image: one 32-character binary instruction per line
    #[arg(required_unless_present = "decode")]
    program: Option<PathBuf>,

    /// Decode a single instruction (binary string or 0x-prefixed hex) and exit
    #[arg(long, value_name = "WORD")]
    decode: Option<String>,

    /// Stop with an error after this many cycles
    #[arg(long, default_value_t = SystemConfig::default().max_cycles)]
    max_cycles: u64,

    /// Data memory size in words
    #[arg(long, default_value_t = SystemConfig::default().memory_words)]
    memory_words: usize,

    /// Register and memory initialisation profile
    #[arg(long, value_enum, default_value_t = Preset::Zeroed)]
    preset: Preset,

    /// Extra register value, applied after the preset (e.g. x5=0x10)
    #[arg(long = "reg", value_name = "xN=VALUE", value_parser = parse_register)]
    registers: Vec<(u8, u32)>,

    /// Extra data memory word, applied after the preset (e.g. 0x70=5)
    #[arg(long = "mem", value_name = "ADDR=VALUE", value_parser = parse_memory)]
    memory: Vec<(u32, u32)>,
}

fn parse_number(text: &str) -> Result<u32, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid number {text:?}: {e}"))
}

fn parse_register(text: &str) -> Result<(u8, u32), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected xN=VALUE, got {text:?}"))?;
    let index = name
        .strip_prefix('x')
        .and_then(|index| index.parse::<u8>().ok())
        .filter(|&index| index < 32)
        .ok_or_else(|| format!("invalid register {name:?}"))?;
    Ok((index, parse_number(value)?))
}

fn parse_memory(text: &str) -> Result<(u32, u32), String> {
    let (address, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VALUE, got {text:?}"))?;
    Ok((parse_number(address)?, parse_number(value)?))
}

fn parse_word(text: &str) -> Result<u32, String> {
    if text.len() == 32 && text.chars().all(|c| c == '0' || c == '1') {
        u32::from_str_radix(text, 2).map_err(|e| e.to_string())
    } else {
        parse_number(text)
    }
}

fn print_decoded(word: u32, instruction: &Instruction) {
    println!("Instruction: {word:#010x}");
    println!("Instruction Type: {}", instruction.format());
    println!("Operation: {}", instruction.operation());
    if let Some(rs1) = instruction.rs1() {
        println!("Rs1: x{rs1}");
    }
    if let Some(rs2) = instruction.rs2() {
        println!("Rs2: x{rs2}");
    }
    if let Some(rd) = instruction.rd() {
        println!("Rd: x{rd}");
    }
    if let Some(funct3) = instruction.funct3() {
        println!("Funct3: {funct3}");
    }
    if let Some(funct7) = instruction.funct7() {
        println!("Funct7: {funct7}");
    }
    if let Some(imm) = instruction.imm() {
        println!("Immediate: {imm} (or {:#x})", imm as u32);
    }
    println!("Assembly: {instruction}");
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    if let Some(text) = args.decode.as_deref() {
        let word = parse_word(text)?;
        print_decoded(word, &decoder::decode(word)?);
        return Ok(());
    }

    let config = SystemConfig {
        memory_words: args.memory_words,
        max_cycles: args.max_cycles,
        ..Default::default()
    };
    let mut rv = RV32ISystem::with_config(config)?;

    let initial_state = args
        .registers
        .iter()
        .fold(InitialState::from_preset(args.preset), |state, &(index, value)| {
            state.register(index, value)
        });
    let initial_state = args
        .memory
        .iter()
        .fold(initial_state, |state, &(address, value)| state.word(address, value));
    rv.initialize(&initial_state)?;

    let Some(path) = args.program else {
        return Err("no program given".into());
    };
    let program = load_program_file(&path, config.max_program_len)?;
    if program.truncated {
        eprintln!(
            "Warning: too many instructions, only the first {} were loaded",
            config.max_program_len
        );
    }
    rv.load_program(program.words);

    let result = rv.run_with(|report| println!("{report}\n"));
    println!("program terminated:");
    println!("total execution time is {} cycles", rv.cycles());
    result?;
    Ok(())
}
