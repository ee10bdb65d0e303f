use alchemy_core::value::{Reference, Value};
use alchemy_core::visit::Visitor;
use alchemy_core::TypeId;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_create_int(c: &mut Criterion) {
    c.bench_function("value_create_int", |b| {
        b.iter(|| Value::from_int(black_box(42)));
    });
}

fn bench_create_double(c: &mut Criterion) {
    c.bench_function("value_create_double", |b| {
        b.iter(|| Value::from_double(black_box(1.5)));
    });
}

fn bench_extract_double(c: &mut Criterion) {
    let val = Value::from_double(1.5);
    c.bench_function("value_extract_double", |b| {
        b.iter(|| black_box(val).as_double());
    });
}

fn bench_get_type(c: &mut Criterion) {
    let values = [
        Value::null(),
        Value::from_int(1),
        Value::from_float(2.0),
        Value::from_double(3.0),
        Value::from_reference(Reference::new(0x1000)),
    ];
    c.bench_function("value_get_type_mixed", |b| {
        b.iter(|| {
            values
                .iter()
                .map(|v| black_box(*v).get_type().raw())
                .sum::<u32>()
        });
    });
}

struct Widen;

impl Visitor for Widen {
    type Output = f64;

    fn visit_type_id(self, _: TypeId) -> f64 {
        0.0
    }
    fn visit_null(self) -> f64 {
        0.0
    }
    fn visit_bool(self, b: bool) -> f64 {
        b as u8 as f64
    }
    fn visit_int(self, i: i32) -> f64 {
        i as f64
    }
    fn visit_uint(self, u: u32) -> f64 {
        u as f64
    }
    fn visit_float(self, f: f32) -> f64 {
        f as f64
    }
    fn visit_reference(self, _: Reference) -> f64 {
        0.0
    }
    fn visit_double(self, d: f64) -> f64 {
        d
    }
}

fn bench_apply(c: &mut Criterion) {
    let val = Value::from_uint(7);
    c.bench_function("value_apply_widen", |b| {
        b.iter(|| black_box(val).apply(Widen));
    });
}

criterion_group!(
    benches,
    bench_create_int,
    bench_create_double,
    bench_extract_double,
    bench_get_type,
    bench_apply
);
criterion_main!(benches);
