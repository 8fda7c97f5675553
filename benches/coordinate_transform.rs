use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdf_field_mapper::geometry::{to_pdf_rect, to_pdf_rect_parts, to_ui_rect, validate, PageDimensions, UiRect};

fn bench_to_pdf_rect(c: &mut Criterion) {
    let ui = UiRect::new(150.0, 300.0, 180.0, 45.0);
    let page = PageDimensions::A4;

    let mut group = c.benchmark_group("to_pdf_rect");

    group.bench_function("struct", |b| {
        b.iter(|| to_pdf_rect(black_box(&ui), black_box(&page), black_box(1.5)))
    });

    group.bench_function("parts", |b| {
        b.iter(|| {
            to_pdf_rect_parts(
                black_box(150.0),
                black_box(300.0),
                black_box(180.0),
                black_box(45.0),
                black_box(595.0),
                black_box(841.0),
                black_box(1.5),
            )
        })
    });

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let ui = UiRect::new(150.0, 300.0, 180.0, 45.0);
    let page = PageDimensions::LETTER;

    c.bench_function("round_trip", |b| {
        b.iter(|| {
            let rect = to_pdf_rect(black_box(&ui), &page, 2.0);
            to_ui_rect(&rect, &page, 2.0)
        })
    });
}

fn bench_drag_sequence(c: &mut Criterion) {
    // One pointer-move per pixel across a page, as during a drag.
    let page = PageDimensions::A4;

    c.bench_function("drag/600_moves", |b| {
        b.iter(|| {
            let mut valid = 0usize;
            for step in 0..600 {
                let ui = UiRect::new(step as f64, step as f64 * 1.3, 120.0, 30.0);
                if validate(&to_pdf_rect(&ui, &page, black_box(1.25))) {
                    valid += 1;
                }
            }
            valid
        })
    });
}

criterion_group!(benches, bench_to_pdf_rect, bench_round_trip, bench_drag_sequence);
criterion_main!(benches);
