use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use shopdesk_agent::IntentRouter;

const QUERIES: &[(&str, &str)] = &[
    ("list_by_category", "Покажи все продукты в категории Электроника"),
    ("add_product", "Добавь новый продукт: Мышка, цена 1500, категория Электроника"),
    ("compute_discount", "Посчитай скидку 15% на продукт id 3"),
    ("average_price", "Какая средняя цена товаров?"),
    ("unrecognized", "Какая сегодня погода?"),
];

fn bench_route(c: &mut Criterion) {
    let router = IntentRouter::new();
    let mut group = c.benchmark_group("router/route");
    group.throughput(Throughput::Elements(1));

    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| {
                let _ = black_box(router.route(black_box(query)));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_route);
criterion_main!(benches);
