use criterion::{Criterion, criterion_group, criterion_main};
use sitelog::Formatter;
use sitelog::Level;
use sitelog::fmt::{LogEvent, RenderContext};
use std::hint::black_box;

fn sample_event(message: &str) -> LogEvent<'_> {
    LogEvent {
        level: Level::Info,
        message,
        file: "src/server/connection/handshake.rs",
        function: "server::connection::handshake",
        line: 217,
        logger: "server.connection",
    }
}

fn bench_render_default(c: &mut Criterion) {
    let formatter = Formatter::compile("[${severity}] [${time}]: ${message}");
    let event = sample_event("Application started successfully");

    c.bench_function("Formatter::render/default", |b| {
        b.iter(|| formatter.render(black_box(&event), &RenderContext::empty()));
    });
}

fn bench_render_call_site_tokens(c: &mut Criterion) {
    let formatter = Formatter::compile("${severity} ${shortfile}:${line} ${function} ${message}");
    let event = sample_event("Application started successfully");

    c.bench_function("Formatter::render/call_site", |b| {
        b.iter(|| formatter.render(black_box(&event), &RenderContext::empty()));
    });
}

fn bench_render_literal_only(c: &mut Criterion) {
    let formatter = Formatter::compile("static prefix with no placeholders");
    let event = sample_event("ignored");

    c.bench_function("Formatter::render/literal_only", |b| {
        b.iter(|| formatter.render(black_box(&event), &RenderContext::empty()));
    });
}

criterion_group!(
    benches,
    bench_render_default,
    bench_render_call_site_tokens,
    bench_render_literal_only,
);
criterion_main!(benches);
