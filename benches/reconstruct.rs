// benches/reconstruct.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use grade_scrape::{
    core::sanitize::normalize_stream,
    engine::reconstruct,
    specs::grade_report::{COLLEGE_TOTAL, COURSE_TOTAL, DEPARTMENT_TOTAL, GRADE_REPORT},
};

fn row(id: &str, count: u32, n: u32) -> Vec<String> {
    let mut out = vec![id.to_string()];
    for _ in 0..5 {
        out.push(count.to_string());
        out.push("%".to_string());
    }
    out.push((count * 5).to_string());
    out.push("2.75".to_string());
    out.extend((0..5).map(|_| "0".to_string()));
    out.push(n.to_string());
    out.push("Dr.%20Synthetic".to_string());
    out
}

/// A large department: `courses` courses of `sections` sections each, with
/// subtotal rows where the report puts them.
fn synthetic_department(courses: u32, sections: u32) -> Vec<String> {
    let mut tokens = Vec::new();
    for c in 0..courses {
        for s in 0..sections {
            tokens.extend(row(&format!("BENCH-{:03}-{:03}", 100 + c, 500 + s), 2, 10));
        }
        tokens.extend(row(COURSE_TOTAL, 2 * sections, 10 * sections));
    }
    let all = courses * sections;
    tokens.extend(row(DEPARTMENT_TOTAL, 2 * all, 10 * all));
    tokens.extend(row(COLLEGE_TOTAL, 2 * all, 10 * all));
    tokens
}

fn bench_reconstruct(c: &mut Criterion) {
    let raw = synthetic_department(60, 8);
    let tokens = normalize_stream(&raw);

    c.bench_function("normalize_stream", |b| {
        b.iter(|| black_box(normalize_stream(black_box(&raw)).len()))
    });

    c.bench_function("reconstruct_department", |b| {
        b.iter(|| {
            let out = reconstruct("BENCH", black_box(&tokens), &GRADE_REPORT);
            black_box(out.map(|r| r.records.len()).unwrap_or(0))
        })
    });
}

criterion_group!(benches, bench_reconstruct);
criterion_main!(benches);
