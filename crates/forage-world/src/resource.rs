//! Depletion, regeneration, and yield math for resource locations.
//!
//! Depletion is stored as a level in `[0, 1]` stamped with the time of the
//! last gather. Regeneration is never stored: every read recomputes a
//! linearly decayed level from the elapsed time, so reads are pure and can
//! be repeated freely.
//!
//! ```text
//! effective = 0                                  if elapsed >= regen_time
//!           = stored * (1 - elapsed / regen_time) otherwise
//! ```
//!
//! The success rate falls with depletion and rises with idle time:
//!
//! ```text
//! rate = clamp(base - effective * penalty + min(bonus_cap, elapsed / bonus_window),
//!              min_rate, max_rate)
//! ```

use serde::{Deserialize, Serialize};

/// Tunable constants of the gather resolution.
///
/// The defaults are the reference values; two engines only agree on
/// outcomes if they share the same tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatherTuning {
    /// Effective depletion at or above which a location refuses gathers.
    #[serde(default = "default_depleted_threshold")]
    pub depleted_threshold: f64,

    /// Success-rate penalty per unit of effective depletion.
    #[serde(default = "default_depletion_penalty")]
    pub depletion_penalty: f64,

    /// Largest success-rate bonus idle time can grant.
    #[serde(default = "default_idle_bonus_cap")]
    pub idle_bonus_cap: f64,

    /// Idle milliseconds that earn one full unit of bonus (before capping).
    #[serde(default = "default_idle_bonus_window_ms")]
    pub idle_bonus_window_ms: u64,

    /// Lower clamp of the success rate.
    #[serde(default = "default_min_success_rate")]
    pub min_success_rate: f64,

    /// Upper clamp of the success rate.
    #[serde(default = "default_max_success_rate")]
    pub max_success_rate: f64,

    /// Probability of taking the terrain's hinted resource when one exists.
    #[serde(default = "default_hint_bias")]
    pub hint_bias: f64,

    /// Fraction of the quantity range removed at full depletion.
    #[serde(default = "default_quantity_shrink")]
    pub quantity_shrink: f64,
}

impl Default for GatherTuning {
    fn default() -> Self {
        Self {
            depleted_threshold: default_depleted_threshold(),
            depletion_penalty: default_depletion_penalty(),
            idle_bonus_cap: default_idle_bonus_cap(),
            idle_bonus_window_ms: default_idle_bonus_window_ms(),
            min_success_rate: default_min_success_rate(),
            max_success_rate: default_max_success_rate(),
            hint_bias: default_hint_bias(),
            quantity_shrink: default_quantity_shrink(),
        }
    }
}

impl GatherTuning {
    /// Check that every value is in a usable range.
    ///
    /// Returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        let unit = |name: &str, v: f64| {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(format!("{name} must be within [0, 1], got {v}"))
            }
        };
        unit("depleted_threshold", self.depleted_threshold)?;
        unit("depletion_penalty", self.depletion_penalty)?;
        unit("idle_bonus_cap", self.idle_bonus_cap)?;
        unit("min_success_rate", self.min_success_rate)?;
        unit("max_success_rate", self.max_success_rate)?;
        unit("hint_bias", self.hint_bias)?;
        unit("quantity_shrink", self.quantity_shrink)?;
        if self.min_success_rate > self.max_success_rate {
            return Err(format!(
                "min_success_rate ({}) exceeds max_success_rate ({})",
                self.min_success_rate, self.max_success_rate
            ));
        }
        if self.idle_bonus_window_ms == 0 {
            return Err("idle_bonus_window_ms must be at least 1".to_owned());
        }
        Ok(())
    }
}

const fn default_depleted_threshold() -> f64 {
    0.8
}
const fn default_depletion_penalty() -> f64 {
    0.7
}
const fn default_idle_bonus_cap() -> f64 {
    0.2
}
const fn default_idle_bonus_window_ms() -> u64 {
    300_000
}
const fn default_min_success_rate() -> f64 {
    0.10
}
const fn default_max_success_rate() -> f64 {
    0.95
}
const fn default_hint_bias() -> f64 {
    0.7
}
const fn default_quantity_shrink() -> f64 {
    0.5
}

/// Depletion after linear time decay. Never exceeds `stored`.
#[allow(clippy::cast_precision_loss)]
pub fn effective_depletion(stored: f64, elapsed_ms: u64, regeneration_time_ms: u64) -> f64 {
    if elapsed_ms >= regeneration_time_ms {
        return 0.0;
    }
    let recovered = elapsed_ms as f64 / regeneration_time_ms as f64;
    (stored * (1.0 - recovered)).clamp(0.0, 1.0)
}

/// Depletion after one successful gather, capped at 1.
pub fn after_gather(depletion: f64, depletion_rate: f64) -> f64 {
    (depletion + depletion_rate).min(1.0)
}

/// Success probability of the next gather roll.
#[allow(clippy::cast_precision_loss)]
pub fn success_rate(
    base_success_rate: f64,
    depletion: f64,
    elapsed_ms: u64,
    tuning: &GatherTuning,
) -> f64 {
    let idle = if tuning.idle_bonus_window_ms == 0 {
        tuning.idle_bonus_cap
    } else {
        (elapsed_ms as f64 / tuning.idle_bonus_window_ms as f64).min(tuning.idle_bonus_cap)
    };
    let raw = base_success_rate - depletion * tuning.depletion_penalty + idle;
    raw.max(tuning.min_success_rate).min(tuning.max_success_rate)
}

/// Shrink `[min, max]` in proportion to depletion.
///
/// Both bounds are scaled by `1 - depletion * shrink` and floored; the
/// lower bound never drops below 1 and the upper never below the lower.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn shrink_quantity_range(min: u32, max: u32, depletion: f64, shrink: f64) -> (u32, u32) {
    let factor = 1.0 - depletion * shrink;
    let scale = |q: u32| (f64::from(q) * factor).floor().max(0.0) as u32;
    let eff_min = scale(min).max(1);
    let eff_max = scale(max).max(eff_min);
    (eff_min, eff_max)
}

/// Milliseconds until a stored depletion decays to zero.
pub fn regeneration_remaining_ms(
    stored: f64,
    last_gathered_ms: u64,
    now_ms: u64,
    regeneration_time_ms: u64,
) -> u64 {
    if stored <= 0.0 {
        return 0;
    }
    last_gathered_ms
        .saturating_add(regeneration_time_ms)
        .saturating_sub(now_ms)
}
