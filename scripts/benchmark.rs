use gbm_option_pricer::analytics::bs_analytic::black_scholes;
use gbm_option_pricer::config::{OptionSpec, OptionType, SimulationConfig};
use gbm_option_pricer::math_utils::Timer;
use gbm_option_pricer::pipeline::price_option;
use std::env;
use std::fs::File;
use std::io::{self, Write};

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    time_ms: f64,
    throughput_paths_per_sec: f64,
    price: f64,
    std_error: f64,
    analytic_price: f64,
    ci_hit: bool,
}

fn run_pricing_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    let path_counts = [10_000, 100_000, 1_000_000];

    for option_type in [OptionType::Call, OptionType::Put] {
        let spec = OptionSpec::default().with_option_type(option_type);
        let analytic_price = black_scholes(&spec).theoretical_price;

        for &paths in &path_counts {
            for parallel in [false, true] {
                println!("Running {} {} paths (parallel: {})...", option_type, paths, parallel);
                let cfg = SimulationConfig {
                    num_simulations: paths,
                    random_seed: Some(42),
                    parallel,
                    ..Default::default()
                };

                let timer = Timer::new();
                let report = match price_option(&spec, &cfg) {
                    Ok(report) => report,
                    Err(e) => {
                        eprintln!("  skipped: {}", e);
                        continue;
                    }
                };
                let time_ms = timer.elapsed_ms();
                let mc = report.monte_carlo;

                results.push(BenchmarkResult {
                    name: format!(
                        "European {} ({})",
                        option_type,
                        if parallel { "parallel" } else { "sequential" }
                    ),
                    paths,
                    time_ms,
                    throughput_paths_per_sec: paths as f64 / (time_ms / 1000.0),
                    price: mc.estimated_price,
                    std_error: mc.standard_error,
                    analytic_price,
                    ci_hit: mc.confidence_interval_95.contains(analytic_price),
                });
            }
        }
    }

    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    writeln!(
        file,
        "Benchmark,Paths,Time_ms,Throughput_paths_per_sec,Price,Std_Error,Analytic_Price,CI_Contains_Analytic"
    )?;
    for r in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{:.6},{:.6},{:.6},{}",
            r.name,
            r.paths,
            r.time_ms,
            r.throughput_paths_per_sec,
            r.price,
            r.std_error,
            r.analytic_price,
            r.ci_hit
        )?;
    }
    Ok(())
}

fn main() {
    println!("gbm-option-pricer benchmark");
    println!("===========================\n");

    let system_info = SystemInfo::gather();
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rayon Threads: {}\n", system_info.rayon_threads);

    let results = run_pricing_benchmarks();

    println!("\n{:=<96}", "");
    println!(
        "{:<30} {:>9} {:>11} {:>14} {:>10} {:>9} {:>10} {:>6}",
        "Benchmark", "Paths", "Time (ms)", "Paths/sec", "Price", "SE", "Analytic", "In CI"
    );
    println!("{:-<96}", "");
    for r in &results {
        println!(
            "{:<30} {:>9} {:>11.2} {:>14.0} {:>10.4} {:>9.4} {:>10.4} {:>6}",
            r.name,
            r.paths,
            r.time_ms,
            r.throughput_paths_per_sec,
            r.price,
            r.std_error,
            r.analytic_price,
            r.ci_hit
        );
    }
    println!("{:=<96}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    match write_results_to_csv(&results, &system_info, &filename) {
        Ok(()) => println!("\nResults saved to: {}", filename),
        Err(e) => eprintln!("\nCould not write {}: {}", filename, e),
    }
}
