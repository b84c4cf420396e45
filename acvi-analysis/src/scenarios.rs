use acvi_core::{Component, WeightVector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Number of randomly perturbed scenarios in the battery.
pub const RANDOM_SCENARIOS: usize = 6;

/// Total size of the fixed battery: equal + 4 dominant + 4 minimized +
/// 6 random + 2 alternative regimes.
pub const BATTERY_SIZE: usize = 17;

/// One named weighting scheme. Scenarios are independent values; none of
/// them mutates the default vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightScenario {
    pub label: String,
    pub weights: WeightVector,
}

/// Build the fixed 17-scenario battery around the default weights.
///
/// The six random variants multiply each default weight by an independent
/// uniform factor in [0.8, 1.2] and renormalize to sum 1, drawn from a
/// ChaCha stream seeded with `seed` so the battery is identical across
/// runs.
pub fn scenario_battery(default: &WeightVector, seed: u64) -> Vec<WeightScenario> {
    let mut scenarios = Vec::with_capacity(BATTERY_SIZE);

    scenarios.push(WeightScenario {
        label: "equal_weights".to_string(),
        weights: WeightVector::equal(),
    });

    for component in Component::ALL {
        let mut weights = [0.167; 4];
        weights[component.index()] = 0.5;
        scenarios.push(WeightScenario {
            label: format!("{component}_dominant"),
            weights: WeightVector::new(weights),
        });
    }

    for component in Component::ALL {
        let mut weights = [0.3; 4];
        weights[component.index()] = 0.1;
        scenarios.push(WeightScenario {
            label: format!("{component}_minimized"),
            weights: WeightVector::new(weights),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for variant in 1..=RANDOM_SCENARIOS {
        let mut weights = [0.0; 4];
        for component in Component::ALL {
            let factor: f64 = rng.gen_range(0.8..1.2);
            weights[component.index()] = default.get(component) * factor;
        }
        scenarios.push(WeightScenario {
            label: format!("perturbed_{variant}"),
            weights: WeightVector::new(weights).normalized(),
        });
    }

    // Two hand-picked alternative regimes: one leaning on the volatility
    // components, one on the stress components.
    scenarios.push(WeightScenario {
        label: "volatility_heavy".to_string(),
        weights: WeightVector::new([0.40, 0.40, 0.15, 0.05]),
    });
    scenarios.push(WeightScenario {
        label: "stress_heavy".to_string(),
        weights: WeightVector::new([0.15, 0.15, 0.40, 0.30]),
    });

    scenarios
}
