use std::time::Instant;
use rand::{ thread_rng, Rng };
use spider_rewrite::{
    graph::*,
    rewrite::*,
};

const N: usize = 10_000;

fn timeit<F, T>(mut f: F) -> (T, f64)
where F: FnMut() -> T
{
    let t0 = Instant::now();
    let out: T = f();
    (out, (Instant::now() - t0).as_secs_f64())
}

// Generate ten thousand green spiders with randomly chosen phases and ten
// thousand randomly chosen wires, and time how long it takes to fuse them all
// together.
fn main() -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let mut diagram = Diagram::new();
    for _ in 0..N {
        diagram.add_spider(Spider::green(rng.gen::<f64>()));
    }
    for _ in 0..N {
        diagram.add_wire(rng.gen_range(0..N), rng.gen_range(0..N))?;
    }
    let total: f64 = diagram.spiders().map(|(_, s)| s.phase).sum();

    println!("# spiders = # wires = {}", N);
    print!("fuse all spiders ... ");
    let (res, t) = timeit(|| rewrite_with_report(diagram.clone(), Flag::FuseSameColor));
    let (fused, report) = res?;
    println!("{:.3} secs", t);
    println!("{:#?}", report);
    let fused_total: f64 = fused.spiders().map(|(_, s)| s.phase).sum();
    println!(
        "{} spiders, {} wires left; phase sum {:.6} -> {:.6}",
        fused.count_spiders(),
        fused.count_wires(),
        total,
        fused_total,
    );

    Ok(())
}
