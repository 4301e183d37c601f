use std::sync::Arc;
use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};
use markdown_livepad_engine::{ContentStore, MathDelimiters, RenderScheduler, Renderer};

fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **bold**, *italic* and `code`.\nSee [docs](https://example.com).\n\n- Bullet point\n- [x] Done task\n\n| a | b |\n|:--|--:|\n| 1 | 2 |\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(10);

    let renderer = Renderer::default();
    let with_math = Renderer::default().with_post_processor(MathDelimiters);

    for size in [10, 100] {
        let content = generate_markdown_content(size);
        group.bench_function(format!("document_{size}"), |b| {
            b.iter(|| std::hint::black_box(renderer.render(std::hint::black_box(&content))));
        });
        group.bench_function(format!("document_{size}_math"), |b| {
            b.iter(|| std::hint::black_box(with_math.render(std::hint::black_box(&content))));
        });
    }

    group.finish();
}

fn bench_editing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(10);

    let content = generate_markdown_content(10);

    group.bench_function("set_content_with_history", |b| {
        let mut store = ContentStore::new("", 100);
        let mut n = 0usize;
        b.iter(|| {
            n += 1;
            store.set_content(format!("{content}{n}"));
        });
    });

    group.bench_function("debounce_burst", |b| {
        let text: Arc<str> = Arc::from(content.as_str());
        b.iter(|| {
            let start = Instant::now();
            let mut scheduler = RenderScheduler::new(Duration::from_millis(300));
            for ms in 0..50 {
                scheduler.on_content_change(Arc::clone(&text), start + Duration::from_millis(ms));
            }
            std::hint::black_box(scheduler.poll(start + Duration::from_secs(1)))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_editing);
criterion_main!(benches);
