#![feature(test)]

extern crate test;

use sparselap::cost::SpotCostFunction;
use sparselap::linker::SparseJaqamanLinker;
use sparselap::spot::collection::SpotCollection;
use sparselap::test_stuff::random_walks;
use test::Bencher;

#[bench]
fn bench_linker_00100(b: &mut Bencher) {
    bench_linker(100, b);
}

#[bench]
fn bench_linker_01000(b: &mut Bencher) {
    bench_linker(1000, b);
}

fn bench_linker(objects: usize, b: &mut Bencher) {
    let spots = random_walks(objects, &[0, 1], 10.0, 1.0);
    let (sources, targets) = (spots.spots(0, true), spots.spots(1, true));
    let cost_function = SpotCostFunction::select(None);

    b.iter(|| {
        let res = SparseJaqamanLinker::new(
            &sources,
            &targets,
            &cost_function,
            25.0,
            1.05,
            90.0,
        )
        .process()
        .unwrap();
        assert!(res.n_links() > 0);
    });
}
