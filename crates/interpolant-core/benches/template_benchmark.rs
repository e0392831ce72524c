use criterion::{black_box, criterion_group, criterion_main, Criterion};
use interpolant_core::{render_args, template::tokenize, Interpolator};
use serde_json::json;

fn benchmark_template_tokenize(c: &mut Criterion) {
    let content = r#"
        <!DOCTYPE html>
        <html>
        <head><title>${title: Untitled}</title></head>
        <body>
            <header>${header}</header>
            <main>${content: nothing here}</main>
            <footer>${footer} &copy; ${}2024</footer>
        </body>
        </html>
    "#;

    c.bench_function("template_tokenize_medium", |b| {
        b.iter(|| tokenize(black_box(content)))
    });
}

fn benchmark_template_render(c: &mut Criterion) {
    let content = r#"
        <div>${slot1}</div>
        <div>${slot2}</div>
        <div>${slot3}</div>
        <div>${slot4}</div>
        <div>${slot5: default}</div>
    "#;

    let interpolator = Interpolator::init(&[
        json!("slot1 ->"), json!("Content 1"),
        json!("slot2 ->"), json!("Content 2"),
        json!("slot3 ->"), json!("Content 3"),
        json!("slot4 ->"), json!(4),
    ])
    .expect("valid context");

    c.bench_function("template_render_5_slots_cached", |b| {
        b.iter(|| interpolator.render(black_box(content)))
    });

    let args = [json!("a"), json!("b"), json!("c")];
    c.bench_function("template_render_positional", |b| {
        b.iter(|| render_args(black_box(content), black_box(&args)))
    });
}

criterion_group!(benches, benchmark_template_tokenize, benchmark_template_render);
criterion_main!(benches);
