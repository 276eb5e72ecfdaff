//! Depolarizing error mitigation.
//!
//! Models the device noise as a global depolarizing channel of strength
//! `p`, estimates `p` from the all-system purity, and removes it from the
//! subsystem purity in closed form (Vovrosh et al., PhysRevE.104.035309).

use serde::{Deserialize, Serialize};

use crate::error::{EntropyError, EntropyResult};

/// Error rate and mitigated purity/entropy of one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MitigatedQuantity {
    /// Estimated depolarizing error rate `p`.
    #[serde(rename = "errorRate")]
    pub error_rate: f64,
    /// Purity after removing the depolarizing contribution.
    #[serde(rename = "mitigatedPurity")]
    pub mitigated_purity: f64,
    /// `-log2` of the mitigated purity.
    #[serde(rename = "mitigatedEntropy")]
    pub mitigated_entropy: f64,
}

/// Solve the depolarizing-channel quadratic for the error rate.
///
/// `a·p² + b·p + c = 0` with `a = 1 + 2^-n - 2^-(n-1)`, `b = 2^-(n-1) - 2`,
/// `c = 1 - meas_series`. Returns the `+`/`-` branches `(pp, pn)`; the
/// lower branch is the physical error rate.
pub fn solve_p(meas_series: f64, n: u32) -> EntropyResult<(f64, f64)> {
    let b = 1.0 / f64::powi(2.0, n as i32 - 1) - 2.0;
    let a = 1.0 + 1.0 / f64::powi(2.0, n as i32) - 1.0 / f64::powi(2.0, n as i32 - 1);
    let c = 1.0 - meas_series;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Err(EntropyError::MitigationDomain {
            reason: format!(
                "negative discriminant {discriminant:e} for all-system purity {meas_series}"
            ),
        });
    }
    let root = discriminant.sqrt();
    let pp = (-b + root) / 2.0 / a;
    let pn = (-b - root) / 2.0 / a;
    Ok((pp, pn))
}

/// Remove a depolarizing contribution of strength `p` from a measured
/// subsystem purity.
pub fn mitigation_equation(p: f64, meas_series: f64, n_a: u32) -> EntropyResult<f64> {
    let denominator = (1.0 - p) * (1.0 - p);
    if denominator == 0.0 {
        return Err(EntropyError::MitigationDomain {
            reason: format!("error rate {p} leaves no signal to mitigate"),
        });
    }
    let p_sq = p * p;
    Ok(
        (meas_series - p_sq / f64::powi(2.0, n_a as i32)
            - (p - p_sq) / f64::powi(2.0, n_a as i32 - 1))
            / denominator,
    )
}

/// Depolarizing error mitigation of a subsystem purity.
///
/// Estimates the error rate from the whole-system purity (`n =
/// system_size`), then corrects the measured subsystem purity (`n_a`
/// qubits).
pub fn depolarizing_error_mitigation(
    meas_system: f64,
    all_system: f64,
    n_a: u32,
    system_size: u32,
) -> EntropyResult<MitigatedQuantity> {
    let (_, pn) = solve_p(all_system, system_size)?;
    let mitigated_purity = mitigation_equation(pn, meas_system, n_a)?;

    Ok(MitigatedQuantity {
        error_rate: pn,
        mitigated_purity,
        mitigated_entropy: -mitigated_purity.log2(),
    })
}
