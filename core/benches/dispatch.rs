//! Chain dispatch benchmarks: probe cost across handler positions.

use lodestar::{DispatchChain, DispatchError, LinkHandler};

fn main() {
    divan::main();
}

#[derive(Debug)]
struct Counter {
    opened: usize,
}

#[derive(Debug)]
struct PrefixHandler {
    name: &'static str,
    prefix: &'static str,
}

impl LinkHandler<Counter> for PrefixHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn can_open(&self, raw: &str) -> bool {
        raw.starts_with(self.prefix)
    }

    fn open(&self, _raw: &str, ctx: &mut Counter) -> Result<(), DispatchError> {
        ctx.opened += 1;
        Ok(())
    }
}

fn chain() -> DispatchChain<Counter> {
    let mut chain = DispatchChain::new();
    for (name, prefix) in [
        ("launch", "app://launch"),
        ("onboarding", "app://onboarding"),
        ("home", "app://home"),
        ("wallet", "app://wallet"),
        ("settings", "app://settings"),
        ("alerts", "app://alerts"),
    ] {
        chain.push(Box::new(PrefixHandler { name, prefix }));
    }
    chain
}

#[divan::bench]
fn dispatch_first_handler(bencher: divan::Bencher) {
    let chain = chain();
    bencher.bench_local(|| {
        let mut ctx = Counter { opened: 0 };
        chain.manage(divan::black_box("app://launch"), &mut ctx)
    });
}

#[divan::bench]
fn dispatch_last_handler(bencher: divan::Bencher) {
    let chain = chain();
    bencher.bench_local(|| {
        let mut ctx = Counter { opened: 0 };
        chain.manage(divan::black_box("app://alerts/price"), &mut ctx)
    });
}

#[divan::bench]
fn dispatch_unclaimed(bencher: divan::Bencher) {
    let chain = chain();
    bencher.bench_local(|| {
        let mut ctx = Counter { opened: 0 };
        chain.manage(divan::black_box("app://profile"), &mut ctx)
    });
}
