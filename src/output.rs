// src/output.rs
use crate::error::{PricingError, PricingResultT};
use crate::pipeline::ComparisonReport;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Labelled multi-section text block for a report
pub fn render_summary(report: &ComparisonReport) -> String {
    report.to_string()
}

/// Write the labelled summary of `report` into any formatter sink
pub fn write_summary<W: fmt::Write + ?Sized>(out: &mut W, report: &ComparisonReport) -> fmt::Result {
    let opt = &report.option;
    let mc = &report.monte_carlo;
    let rule = "=".repeat(60);
    let kind = opt.option_type.as_str();

    writeln!(out, "{}", rule)?;
    writeln!(out, "Monte Carlo Options Pricing Results")?;
    writeln!(out, "{}\n", rule)?;
    writeln!(out, "Option Parameters:")?;
    writeln!(out, "  Type:                  {}", kind.to_uppercase())?;
    writeln!(out, "  Spot Price (S0):       ${:.2}", opt.spot_price)?;
    writeln!(out, "  Strike Price (K):      ${:.2}", opt.strike_price)?;
    writeln!(out, "  Time to Expiration:    {:.2} years", opt.time_to_expiration)?;
    writeln!(out, "  Risk-Free Rate:        {:.2}%", opt.risk_free_rate * 100.0)?;
    writeln!(out, "  Volatility (σ):        {:.2}%\n", opt.volatility * 100.0)?;
    writeln!(out, "Simulation Parameters:")?;
    writeln!(
        out,
        "  Number of Simulations: {}\n",
        group_thousands(report.simulation.num_simulations)
    )?;
    writeln!(out, "Monte Carlo Results:")?;
    writeln!(out, "  Estimated Price:       ${:.4}", mc.estimated_price)?;
    writeln!(out, "  Standard Error:        ${:.4}", mc.standard_error)?;
    writeln!(
        out,
        "  95% Confidence Interval: [${:.4}, ${:.4}]",
        mc.confidence_interval_95.low, mc.confidence_interval_95.high
    )?;
    if mc.is_single_sample() {
        writeln!(out, "  (single path: standard error not meaningful)")?;
    }
    writeln!(out)?;
    writeln!(out, "Black-Scholes Results:")?;
    writeln!(out, "  Theoretical Price:     ${:.4}\n", report.analytic.theoretical_price)?;
    writeln!(out, "Comparison:")?;
    writeln!(out, "  Absolute Difference:   ${:.4}", report.absolute_difference)?;
    writeln!(out, "  Percentage Difference: {:.2}%\n", report.percentage_difference)?;
    writeln!(out, "Interpretation:")?;
    writeln!(
        out,
        "  The Monte Carlo simulation estimates the {} option price",
        kind
    )?;
    writeln!(
        out,
        "  at ${:.4}, which differs from the Black-Scholes theoretical",
        mc.estimated_price
    )?;
    writeln!(
        out,
        "  price by {:.2}%. This difference is due to",
        report.percentage_difference
    )?;
    writeln!(
        out,
        "  Monte Carlo sampling error and typically decreases with more simulations.\n"
    )?;
    write!(out, "{}", rule)
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, self)
    }
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// One row per path: terminal price and payoff
pub fn write_samples_to_csv(
    filename: impl AsRef<Path>,
    terminal_prices: &[f64],
    payoffs: &[f64],
) -> PricingResultT<()> {
    if terminal_prices.len() != payoffs.len() {
        return Err(PricingError::invalid_config(
            "payoffs",
            format!(
                "{} payoffs for {} terminal prices",
                payoffs.len(),
                terminal_prices.len()
            ),
        ));
    }
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "path_id,s_t,payoff")?;
    for (i, (s_t, payoff)) in terminal_prices.iter().zip(payoffs).enumerate() {
        writeln!(file, "{},{},{}", i, s_t, payoff)?;
    }
    file.flush()?;
    Ok(())
}

/// Key/value rows of every numeric report field
pub fn write_summary_to_csv(filename: impl AsRef<Path>, report: &ComparisonReport) -> PricingResultT<()> {
    let mc = &report.monte_carlo;
    let summary_data = [
        ("estimated_price", mc.estimated_price),
        ("standard_error", mc.standard_error),
        ("confidence_interval_95_low", mc.confidence_interval_95.low),
        ("confidence_interval_95_high", mc.confidence_interval_95.high),
        ("theoretical_price", report.analytic.theoretical_price),
        ("absolute_difference", report.absolute_difference),
        ("percentage_difference", report.percentage_difference),
    ];

    let mut file = File::create(filename)?;
    writeln!(file, "field,value")?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over [min, max]; the top edge falls in the last bin
pub fn histogram(values: &[f64], num_bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || num_bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / num_bins as f64;
    let mut counts = vec![0usize; num_bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(num_bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}
