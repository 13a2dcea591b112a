use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dmr_trunkctl::{Bits, Controller, CsPdu, NullTuner, PolicyConfig};
use std::time::{Duration, Instant};

fn set_field(raw: &mut [u8], offset: usize, width: usize, value: u64) {
    for i in 0..width {
        let bit = (value >> (width - 1 - i)) & 1;
        raw[offset + i] = bit as u8;
    }
}

fn tv_grant_pdu(lpchannum: u16, target: u32, source: u32) -> Vec<u8> {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 2, 6, 49); // TV_GRANT
    set_field(&mut raw, 8, 8, 0); // FID_ETSI
    set_field(&mut raw, 20, 12, lpchannum as u64);
    set_field(&mut raw, 32, 24, target as u64);
    set_field(&mut raw, 56, 24, source as u64);
    raw
}

fn cap_plus_status_pdu(rest_lsn: u8) -> Vec<u8> {
    let mut raw = vec![0u8; 96];
    set_field(&mut raw, 2, 6, 0x3E);
    set_field(&mut raw, 8, 8, 0x10);
    set_field(&mut raw, 16, 2, 3); // fl=3, single block
    set_field(&mut raw, 20, 4, rest_lsn as u64);
    raw
}

fn benchmark_bit_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_reader");
    let raw = tv_grant_pdu(12, 3101, 1234567);
    let bits = Bits::new(&raw);

    group.bench_function("read_24bit_field", |b| {
        b.iter(|| bits.read(black_box(32), black_box(24), "target").unwrap());
    });

    group.bench_function("read_single_bit", |b| {
        b.iter(|| bits.read_bit(black_box(1), "pf").unwrap());
    });

    group.finish();
}

fn benchmark_csbk_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("csbk_parse");
    group.measurement_time(Duration::from_secs(5));

    let grant = tv_grant_pdu(12, 3101, 1234567);
    group.bench_function("etsi_channel_grant", |b| {
        b.iter(|| {
            let bits = Bits::new(black_box(&grant));
            let _ = dmr_trunkctl::parse_csbk(&bits, 0, 49, 0);
        });
    });

    let mut aloha = vec![0u8; 96];
    set_field(&mut aloha, 40, 2, 1); // model=Small
    set_field(&mut aloha, 42, 7, 5);
    set_field(&mut aloha, 49, 5, 6);
    group.bench_function("etsi_aloha_sys_parms", |b| {
        b.iter(|| {
            let bits = Bits::new(black_box(&aloha));
            let _ = dmr_trunkctl::parse_csbk(&bits, 0, 25, 0);
        });
    });

    group.finish();
}

// `Controller::process` is async (the `Tuner` calls it awaits model the
// blocking socket writes / device ioctls of spec.md §5), but criterion's
// default harness is synchronous; a small current-thread runtime blocks on
// it the way the teacher's own CLI binary does for its one-shot commands.
fn benchmark_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("dispatch");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("process_tv_grant_end_to_end", |b| {
        b.iter_batched(
            || {
                let mut controller = Controller::new(PolicyConfig::default(), NullTuner::default());
                controller.site.cc_freq = 452_000_000;
                controller.site.trunk_chan_map.insert(12, 451_025_000);
                let pdu = CsPdu {
                    bits: tv_grant_pdu(12, 3101, 1234567),
                    crc_ok: true,
                    irrecoverable_errors: 0,
                    synctype: 0,
                    slot: 0,
                };
                (controller, pdu)
            },
            |(mut controller, pdu)| {
                rt.block_on(async { controller.process(black_box(&pdu), Instant::now()).await })
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_cap_plus_reassembly(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("cap_plus_reassembly");

    group.bench_function("single_block_status", |b| {
        b.iter_batched(
            || {
                let controller = Controller::new(PolicyConfig::default(), NullTuner::default());
                let pdu = CsPdu {
                    bits: cap_plus_status_pdu(5),
                    crc_ok: true,
                    irrecoverable_errors: 0,
                    synctype: 0,
                    slot: 0,
                };
                (controller, pdu)
            },
            |(mut controller, pdu)| {
                rt.block_on(async { controller.process(black_box(&pdu), Instant::now()).await })
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_with_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("performance_targets");
    group.significance_level(0.05);

    let grant = tv_grant_pdu(12, 3101, 1234567);
    group.bench_with_input(BenchmarkId::new("csbk_parse_under_1us", "tv_grant"), &grant, |b, data| {
        b.iter(|| {
            let bits = Bits::new(black_box(data));
            let _ = dmr_trunkctl::parse_csbk(&bits, 0, 49, 0);
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets = benchmark_bit_reader,
              benchmark_csbk_parse,
              benchmark_dispatch,
              benchmark_cap_plus_reassembly,
              benchmark_with_id
}
criterion_main!(benches);
