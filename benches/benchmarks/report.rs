use criterion::{black_box, criterion_group, Criterion};
use seqbench::measurement::{parse_measurements, BestOfTrials};
use seqbench::report::{BarChart, ChartRenderer, Series};

const CONTAINERS: [&str; 6] = ["segmented_tree_seq", "btree_seq", "bpt_sequence", "avl_array", "deque", "vector"];

fn benchmark_output() -> String {
    let mut output = String::new();
    for name in ["Insert values", "Accumulate forward", "Accumulate backward", "Erase values"] {
        for by in [1, 10, 100, 1000, 10000] {
            output.push_str(&format!("{} by {},{}.{}\n", name, by, by * 3, by % 7));
        }
    }
    output
}

fn benchmark_best_of_trials(c: &mut Criterion) {
    let output = benchmark_output();
    c.bench_function("best_of_5_trials", |b| {
        b.iter(|| {
            let mut best = BestOfTrials::new();
            for _ in 0..5 {
                best.merge_trial(parse_measurements(black_box(&output)).expect("valid output"));
            }
            black_box(best)
        })
    });
}

fn benchmark_render_chart(c: &mut Criterion) {
    let renderer = ChartRenderer::new().expect("chart template");
    let chart = BarChart {
        title: "Insert values of std::uint8_t".to_string(),
        x_label: "Container size".to_string(),
        y_label: "Milliseconds".to_string(),
        labels: vec!["256".to_string(), "7936".to_string(), "246016".to_string(), "7626496".to_string()],
        series: CONTAINERS
            .iter()
            .enumerate()
            .map(|(n, name)| Series {
                name: name.to_string(),
                values: (0..4).map(|i| Some(0.01 * 31_f64.powi(i) * (n + 1) as f64)).collect(),
            })
            .collect(),
    };

    c.bench_function("render_bar_chart", |b| {
        b.iter(|| black_box(renderer.render(black_box(&chart)).expect("rendered")))
    });
}

criterion_group!(report, benchmark_best_of_trials, benchmark_render_chart);
