use criterion::{Criterion, black_box, criterion_group, criterion_main};
use validatetest_fmt::{FormatOptions, format_source};

const SCENARIO: &str = r#"# Seek while playing
meta,
    handles-states=true,
    args={"videotestsrc ! fakesink"},
    expected-issues={
        "expected-issue, issue-id=runtime::not-negotiated, level=critical",
    }

set-properties, videotestsrc0::pattern=ball, videotestsrc0::is-live=true
play
seek, start=1.0, flags=accurate+flush
check-properties,videotestsrc0::pattern=ball
stop;
"#;

fn bench_format(c: &mut Criterion) {
    if tree_sitter_validatetest::language_fn().is_err() {
        eprintln!("validatetest grammar not linked, skipping formatter benchmarks");
        return;
    }

    let options = FormatOptions::default();
    let narrow = FormatOptions::new().with_max_line_length(40);

    c.bench_function("format_scenario", |b| {
        b.iter(|| format_source(black_box(SCENARIO), &options).unwrap());
    });

    c.bench_function("format_scenario_narrow", |b| {
        b.iter(|| format_source(black_box(SCENARIO), &narrow).unwrap());
    });
}

criterion_group!(benches, bench_format);
criterion_main!(benches);
