use std::{env, fs};

use toyasm::logging::error;
use toyasm::simulator::Simulator;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <input.obj>", args[0]);
        std::process::exit(1);
    }

    let image = fs::read(&args[1]).unwrap_or_else(|e| {
        error(format!("failed to read {}: {}", args[1], e));
        std::process::exit(2);
    });

    let mut sim = Simulator::new();
    sim.load(&image);

    sim.run().unwrap_or_else(|e| {
        error(format!("simulation failed: {}", e));
        std::process::exit(3);
    });
}
