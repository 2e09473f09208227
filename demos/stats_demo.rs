use clap::Parser;
use probe_table::HashTable;

#[derive(Parser, Debug)]
struct Args {
    /// Number of distinct keys to insert.
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: usize,

    /// Remove every n-th key after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: usize,
}

fn main() -> Result<(), probe_table::Error> {
    let args = Args::parse();

    println!("Creating HashTable for {} entries", args.entries);
    let mut table = HashTable::new()?;
    println!("Initial capacity: {}", table.capacity());

    for i in 0..args.entries as u64 {
        let key = format!("key_{i:016X}");
        table.set(&key, &i.to_le_bytes())?;
    }

    if args.remove_every > 0 {
        let mut removed = 0;
        for i in (0..args.entries as u64).step_by(args.remove_every) {
            if table.remove(&format!("key_{i:016X}"))?.is_some() {
                removed += 1;
            }
        }
        println!("Removed {} entries", removed);
    }

    println!("Inserted {} entries, final capacity {}", table.len(), table.capacity());
    println!("Final load factor: {:.2}%", table.load_factor() * 100.0);

    table.probe_histogram().print();
    table.debug_stats().print();

    Ok(())
}
