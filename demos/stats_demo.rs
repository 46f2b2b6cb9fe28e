use clap::Parser;
use fimap::IntMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "count", default_value_t = 100_000)]
    count: usize,

    #[arg(short = 'f', long = "fill_factor", default_value_t = fimap::DEFAULT_FILL_FACTOR)]
    fill_factor: f64,

    /// Fraction of the inserted keys to remove afterwards.
    #[arg(short = 'r', long = "remove_fraction", default_value_t = 0.5)]
    remove_fraction: f64,

    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), fimap::Error> {
    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(args.seed);

    println!(
        "Creating IntMap sized for {} entries at fill factor {}",
        args.count, args.fill_factor
    );

    let mut map: IntMap<u64> = IntMap::with_fill_factor(args.count, args.fill_factor)?;
    println!(
        "Initial buckets: {} (threshold {})",
        map.capacity(),
        map.threshold()
    );

    let mut keys = Vec::with_capacity(args.count);
    while map.len() < args.count {
        let key = rng.random::<u64>();
        if map.insert(key, key).is_none() {
            keys.push(key);
        }
    }

    println!("Inserted {} keys", map.len());
    map.print_probe_histogram();
    map.debug_stats().print();

    let to_remove = (keys.len() as f64 * args.remove_fraction) as usize;
    for &key in keys.iter().take(to_remove) {
        map.remove(key);
    }

    println!();
    println!("Removed {} keys", to_remove);
    map.print_probe_histogram();
    map.debug_stats().print();

    Ok(())
}
