use adaptive_playout::playout::{
    Calibration, DropScheduler, PlayoutController, PlayoutThresholds, SessionConfig,
};
use adaptive_playout::testing::session_frame;
use adaptive_playout::{MemorySink, PlaybackSink};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn benchmark_scheduler(c: &mut Criterion) {
    let mut scheduler = DropScheduler::new(PlayoutThresholds::default());
    let mut backlog = 0u32;

    c.bench_function("scheduler_decide_varying_backlog", |b| {
        b.iter(|| {
            backlog = (backlog + 7) % 40;
            scheduler.decide(black_box(backlog))
        })
    });
}

fn benchmark_submit(c: &mut Criterion) {
    let session = SessionConfig::default();
    let fb = session.bytes_per_frame();
    let mut controller =
        PlayoutController::new(MemorySink::new(64 * fb), PlayoutThresholds::default());
    controller
        .start(session, &Calibration::Disabled)
        .expect("memory sink opens");

    let mut device = controller
        .sink_mut()
        .take_consumer()
        .expect("sink is open");
    let frame = session_frame(&session);
    let mut period = vec![0u8; fb];

    c.bench_function("controller_submit_stereo_5ms", |b| {
        b.iter(|| {
            let outcome = controller.submit(black_box(&frame));
            device.read(&mut period);
            outcome
        })
    });

    black_box(controller.sink().pending_bytes());
}

criterion_group!(benches, benchmark_scheduler, benchmark_submit);
criterion_main!(benches);
