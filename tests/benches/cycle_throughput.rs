use criterion::{black_box, criterion_group, criterion_main, Criterion};
use heapless::spsc::Queue;
use ps2pad_core::{Button, ButtonMask, OutputQueue, PadFsm, Profile, Settings};
use ps2pad_tests::Harness;

fn fsm_update(c: &mut Criterion) {
    let masks = [
        ButtonMask::from_pressed(&[Button::A, Button::Up]),
        ButtonMask::from_pressed(&[Button::B, Button::Down, Button::Left]),
        ButtonMask::RELEASED,
    ];

    c.bench_function("fsm_update", |b| {
        let mut queue: OutputQueue = Queue::new();
        let (mut producer, mut consumer) = queue.split();
        let mut fsm = PadFsm::new(Settings { profile: Profile::Emulator, swap_ab: false });
        let mut i = 0;
        b.iter(|| {
            let step = fsm.update(black_box(masks[i % masks.len()]), &mut producer);
            while consumer.dequeue().is_some() {}
            i += 1;
            step
        })
    });
}

fn bridge_cycle(c: &mut Criterion) {
    c.bench_function("bridge_cycle", |b| {
        let mut harness = Harness::new(Settings::default());
        let mut pressed = false;
        b.iter(|| {
            pressed = !pressed;
            let mask = if pressed {
                ButtonMask::from_pressed(&[Button::A])
            } else {
                ButtonMask::RELEASED
            };
            let report = harness.step(mask);
            if harness.sent().len() > 4096 {
                harness.take_sent();
            }
            black_box(report)
        })
    });
}

criterion_group!(benches, fsm_update, bridge_cycle);
criterion_main!(benches);
