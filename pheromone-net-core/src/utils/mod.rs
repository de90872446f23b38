pub mod alloc;
pub mod benchmark;

pub use benchmark::{BenchmarkReport, TickBenchmark};
