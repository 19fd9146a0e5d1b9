// tests/integration_test.rs
use gbm_option_pricer::analytics::bs_analytic;
use gbm_option_pricer::config::{OptionSpec, OptionType, SimulationConfig};
use gbm_option_pricer::mc::mc_engine::mc_estimate;
use gbm_option_pricer::models::gbm::generate_terminal_prices;
use gbm_option_pricer::pipeline::{price_option, price_option_with_paths};
use gbm_option_pricer::rng::GaussianRng;
use gbm_option_pricer::PricingError;

fn reference_config() -> SimulationConfig {
    SimulationConfig {
        num_simulations: 10_000,
        random_seed: Some(42),
        ..Default::default()
    }
}

#[test]
fn test_reference_call_scenario() {
    let report = price_option(&OptionSpec::default(), &reference_config()).expect("Valid configuration");
    let mc = &report.monte_carlo;

    println!("\nMC Price: {}", mc.estimated_price);
    println!("Standard Error: {}", mc.standard_error);
    println!("Analytic Price: {}", report.analytic.theoretical_price);
    println!("Percentage Difference: {}", report.percentage_difference);

    assert!((report.analytic.theoretical_price - 10.4506).abs() < 1e-4);
    assert!(mc.confidence_interval_95.contains(mc.estimated_price));
    assert_eq!(mc.num_samples, 10_000);
    // 10k paths: SE is roughly 1.4% of the price
    assert!(mc.standard_error > 0.05 && mc.standard_error < 0.3);
    assert!(
        report.absolute_difference < 4.0 * mc.standard_error,
        "MC {} too far from BS {}",
        mc.estimated_price,
        report.analytic.theoretical_price
    );
}

#[test]
fn test_reference_put_scenario() {
    let spec = OptionSpec::default().with_option_type(OptionType::Put);
    let report = price_option(&spec, &reference_config()).expect("Valid configuration");

    assert!((report.analytic.theoretical_price - 5.5735).abs() < 1e-4);
    assert!(report.absolute_difference < 4.0 * report.monte_carlo.standard_error);
}

#[test]
fn test_large_sample_percentage_difference() {
    let cfg = SimulationConfig {
        num_simulations: 1_000_000,
        random_seed: Some(42),
        parallel: true,
        ..Default::default()
    };
    let report = price_option(&OptionSpec::default(), &cfg).expect("Valid configuration");

    println!("\nParallel MC Price (1M paths): {}", report.monte_carlo.estimated_price);
    println!("Percentage Difference: {}", report.percentage_difference);

    assert!(report.percentage_difference < 2.0);
    assert!(report.absolute_difference < 4.0 * report.monte_carlo.standard_error);
}

#[test]
fn test_fixed_seed_is_bit_identical() {
    let spec = OptionSpec::default();
    for parallel in [false, true] {
        let cfg = SimulationConfig {
            parallel,
            ..reference_config()
        };
        let a = price_option(&spec, &cfg).expect("Valid configuration");
        let b = price_option(&spec, &cfg).expect("Valid configuration");
        assert_eq!(
            a.monte_carlo.estimated_price.to_bits(),
            b.monte_carlo.estimated_price.to_bits()
        );
        assert_eq!(
            a.monte_carlo.standard_error.to_bits(),
            b.monte_carlo.standard_error.to_bits()
        );
    }
}

#[test]
fn test_different_seeds_differ() {
    let spec = OptionSpec::default();
    let a = price_option(&spec, &reference_config()).expect("Valid configuration");
    let b = price_option(
        &spec,
        &SimulationConfig {
            random_seed: Some(43),
            ..reference_config()
        },
    )
    .expect("Valid configuration");
    assert_ne!(a.monte_carlo.estimated_price, b.monte_carlo.estimated_price);
}

#[test]
fn test_unseeded_runs_are_independent() {
    let cfg = SimulationConfig {
        random_seed: None,
        ..reference_config()
    };
    let a = price_option(&OptionSpec::default(), &cfg).expect("Valid configuration");
    let b = price_option(&OptionSpec::default(), &cfg).expect("Valid configuration");
    assert_ne!(a.monte_carlo.estimated_price, b.monte_carlo.estimated_price);
}

#[test]
fn test_zero_simulations_is_invalid_configuration() {
    let cfg = SimulationConfig {
        num_simulations: 0,
        ..Default::default()
    };
    match price_option(&OptionSpec::default(), &cfg) {
        Err(PricingError::InvalidConfiguration { field, .. }) => assert_eq!(field, "num_simulations"),
        other => panic!("expected InvalidConfiguration, got {:?}", other.map(|r| r.monte_carlo)),
    }
}

#[test]
fn test_invalid_option_parameters_are_named() {
    let cases = [
        ("spot_price", OptionSpec { spot_price: 0.0, ..OptionSpec::default() }),
        ("strike_price", OptionSpec { strike_price: -10.0, ..OptionSpec::default() }),
        ("time_to_expiration", OptionSpec { time_to_expiration: 0.0, ..OptionSpec::default() }),
        ("volatility", OptionSpec { volatility: -0.1, ..OptionSpec::default() }),
    ];
    for (name, spec) in cases {
        let err = price_option(&spec, &reference_config()).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains(name), "{} not named in '{}'", name, err);
    }
}

#[test]
fn test_zero_volatility_degenerate_case() {
    let spec = OptionSpec {
        volatility: 0.0,
        ..OptionSpec::default()
    };
    let cfg = reference_config();
    let forward = spec.spot_price * (spec.risk_free_rate * spec.time_to_expiration).exp();

    let mut rng = GaussianRng::from_seed(Some(42));
    let terminal = generate_terminal_prices(&spec, &cfg, &mut rng);
    for &s_t in &terminal {
        assert!((s_t - forward).abs() < 1e-10 * forward);
    }

    let result = mc_estimate(&terminal, &spec).expect("non-empty sample");
    let deterministic = spec.discount_factor() * (forward - spec.strike_price).max(0.0);
    assert!((result.estimated_price - deterministic).abs() < 1e-10);
    assert!(result.standard_error < 1e-10);

    let report = price_option(&spec, &cfg).expect("Valid configuration");
    assert!(report.analytic.d1.is_none());
    assert!((report.analytic.theoretical_price - deterministic).abs() < 1e-10);
    assert!(report.absolute_difference < 1e-10);
}

#[test]
fn test_terminal_prices_strictly_positive() {
    let spec = OptionSpec {
        volatility: 1.5,
        time_to_expiration: 5.0,
        spot_price: 1.0,
        ..OptionSpec::default()
    };
    let cfg = SimulationConfig {
        num_simulations: 50_000,
        ..reference_config()
    };
    let mut rng = GaussianRng::from_seed(Some(7));
    let terminal = generate_terminal_prices(&spec, &cfg, &mut rng);
    assert!(terminal.iter().all(|&s| s > 0.0 && s.is_finite()));
}

#[test]
fn test_full_path_mode_agrees_with_analytic() {
    let cfg = SimulationConfig {
        num_simulations: 20_000,
        num_steps: 50,
        random_seed: Some(11),
        ..Default::default()
    };
    let run = price_option_with_paths(&OptionSpec::default(), &cfg).expect("Valid configuration");

    assert_eq!(run.paths.num_paths(), 20_000);
    assert!(run.paths.as_array().iter().all(|&s| s > 0.0));
    for i in 0..10 {
        assert_eq!(run.paths.path(i)[0], 100.0);
    }
    let mc = &run.report.monte_carlo;
    assert!(run.report.absolute_difference < 4.0 * mc.standard_error);
}

#[test]
fn test_single_simulation_policy() {
    let cfg = SimulationConfig {
        num_simulations: 1,
        ..reference_config()
    };
    let report = price_option(&OptionSpec::default(), &cfg).expect("N = 1 is valid");
    assert!(report.monte_carlo.is_single_sample());
    assert_eq!(report.monte_carlo.standard_error, 0.0);
    assert_eq!(
        report.monte_carlo.confidence_interval_95.low,
        report.monte_carlo.confidence_interval_95.high
    );
}

#[test]
fn test_report_serializes_with_public_field_names() {
    let report = price_option(&OptionSpec::default(), &reference_config()).expect("Valid configuration");
    let json = serde_json::to_value(&report).expect("serializable");

    let mc = &json["monte_carlo"];
    assert!(mc["estimated_price"].is_f64());
    assert!(mc["standard_error"].is_f64());
    assert!(mc["confidence_interval_95"]["low"].is_f64());
    assert!(mc["confidence_interval_95"]["high"].is_f64());
    assert!(json["analytic"]["theoretical_price"].is_f64());
    assert!(json["absolute_difference"].is_f64());
    assert!(json["percentage_difference"].is_f64());
    assert_eq!(json["option"]["option_type"], "call");

    let expected = bs_analytic::bs_call_price(100.0, 100.0, 0.05, 0.2, 1.0);
    assert_eq!(json["analytic"]["theoretical_price"].as_f64(), Some(expected));
}
