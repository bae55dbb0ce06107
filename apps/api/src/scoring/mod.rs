// Career scoring: confidence, risk, explanations, skill gaps, job fit and what-if simulation.
// Every analyzer here is pure and synchronous over already-loaded assessment data.

pub mod confidence;
pub mod explainability;
pub mod handlers;
pub mod job_fit;
pub mod risk;
pub mod simulator;
pub mod skill_gap;

/// Rounds `value` half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(72.875, 1), 72.9);
        assert_eq!(round_to(66.66666, 1), 66.7);
        assert_eq!(round_to(12.0, 2), 12.0);
    }
}
