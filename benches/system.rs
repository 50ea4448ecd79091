#![allow(clippy::unusual_byte_groupings)]

use criterion::{Criterion, criterion_group, criterion_main};
use riscv_datapath::{RV32ISystem, SystemConfig, decoder};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("100 instructions", |b| {
        b.iter(|| {
            let mut rv = RV32ISystem::new();
            rv.reg_file.write(1, 0x0102_0304).unwrap();
            rv.reg_file.write(2, 0x0203_0405).unwrap();

            rv.load_program(vec![0b000000000001_00001_000_00011_0010011; 100]); // addi x3, x1, 1
            rv.run().unwrap()
        })
    });

    c.bench_function("loop 1000 cycles", |b| {
        b.iter(|| {
            let mut rv = RV32ISystem::with_config(SystemConfig {
                max_cycles: 1000,
                ..Default::default()
            })
            .unwrap();
            rv.load_program(vec![
                0b000000000001_00001_000_00001_0010011,   // addi x1, x1, 1
                0b0000000_00001_00000_010_00000_0100011,  // sw x1, 0(x0)
                0b1_111111_00000_00000_000_1100_1_1100011, // beq x0, x0, -8
            ]);
            rv.run().unwrap_err()
        })
    });

    c.bench_function("decode", |b| {
        b.iter(|| decoder::decode(std::hint::black_box(0xfe812623)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
