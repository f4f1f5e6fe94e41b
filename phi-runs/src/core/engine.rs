//! Exact-length decimal expansion of the golden ratio.
//!
//! For `k` fractional digits the engine evaluates
//!
//! ```text
//! floor(phi * 10^k) = (10^k + isqrt(5 * 10^(2k))) / 2
//! ```
//!
//! with exact integer arithmetic. `10^k + isqrt(..)` is an integer and the
//! dropped part of `sqrt(5) * 10^k` is below one, so halving with truncation
//! yields the true floor. The output is therefore the truncated expansion,
//! and a longer request can never change a digit a shorter one produced.

use num_bigint::BigUint;
use tracing::debug;

/// Working-precision policy for [`compute_digits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Extra significant digits carried beyond the requested length.
    pub margin: usize,
    /// Precision added on each retry when a rendering comes up short.
    pub increment: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            margin: 50,
            increment: 50,
        }
    }
}

/// Return exactly `target_len` characters of the golden ratio: `"1."`
/// followed by fractional digits.
///
/// Precision starts at `target_len + margin` significant digits and grows by
/// `increment` until the rendering is long enough. The retry is internal.
/// The exact renderer always yields `precision + 1` characters, so with this
/// substrate the first attempt is already long enough and the retry only
/// guards the contract.
pub fn compute_digits(target_len: usize, config: &EngineConfig) -> String {
    extend_until_long_enough(target_len, config, render_phi)
}

fn extend_until_long_enough(
    target_len: usize,
    config: &EngineConfig,
    render: impl Fn(usize) -> String,
) -> String {
    if target_len == 0 {
        return String::new();
    }

    let mut precision = target_len.saturating_add(config.margin);
    loop {
        let mut rendered = render(precision);
        if rendered.len() >= target_len {
            rendered.truncate(target_len);
            return rendered;
        }
        debug!(
            precision,
            rendered = rendered.len(),
            target_len,
            "precision insufficient, retrying"
        );
        precision = precision.saturating_add(config.increment.max(1));
    }
}

/// Render phi with `precision` significant digits (one integer digit plus
/// `precision - 1` fractional digits) as `"1.xxxx"`.
fn render_phi(precision: usize) -> String {
    let fractional = precision.saturating_sub(1);
    let digits = scaled_phi(fractional).to_str_radix(10);

    let mut rendered = String::with_capacity(digits.len() + 1);
    let (integer, fraction) = digits.split_at(1);
    rendered.push_str(integer);
    rendered.push('.');
    rendered.push_str(fraction);
    rendered
}

/// `floor(phi * 10^k)`.
fn scaled_phi(k: usize) -> BigUint {
    let scale = num_traits::pow(BigUint::from(10u32), k);
    let root = (&scale * &scale * 5u32).sqrt();
    (scale + root) / 2u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHI_60: &str = "1.6180339887498948482045868343656381177203091798057628621354";

    #[test]
    fn short_lengths_are_exact() {
        let config = EngineConfig::default();
        assert_eq!(compute_digits(0, &config), "");
        assert_eq!(compute_digits(1, &config), "1");
        assert_eq!(compute_digits(2, &config), "1.");
        assert_eq!(compute_digits(3, &config), "1.6");
    }

    #[test]
    fn matches_known_expansion() {
        let digits = compute_digits(PHI_60.len(), &EngineConfig::default());
        assert_eq!(digits, PHI_60);
    }

    #[test]
    fn returns_exact_length() {
        let config = EngineConfig::default();
        for len in [1, 2, 17, 100, 1_001] {
            assert_eq!(compute_digits(len, &config).len(), len);
        }
    }

    #[test]
    fn zero_margin_still_satisfies_length() {
        let config = EngineConfig {
            margin: 0,
            increment: 1,
        };
        assert_eq!(compute_digits(PHI_60.len(), &config), PHI_60);
    }

    #[test]
    fn result_does_not_depend_on_margin() {
        let base = compute_digits(500, &EngineConfig::default());
        for margin in [0, 1, 2, 7, 49, 50, 51, 500] {
            let config = EngineConfig {
                margin,
                increment: 50,
            };
            assert_eq!(compute_digits(500, &config), base, "margin {margin}");
        }
    }

    #[test]
    fn renderer_yields_one_more_character_than_precision() {
        for precision in [1, 2, 50, 333] {
            assert_eq!(render_phi(precision).len(), precision + 1);
        }
    }

    #[test]
    fn short_rendering_is_retried_with_more_precision() {
        // Renders drop the last 100 characters, so attempts at 110 and 160
        // come up short and the third attempt (210) is the first long enough.
        let attempts = std::cell::RefCell::new(Vec::new());
        let lossy = |precision: usize| {
            attempts.borrow_mut().push(precision);
            let mut rendered = render_phi(precision);
            rendered.truncate(rendered.len().saturating_sub(100));
            rendered
        };
        let config = EngineConfig {
            margin: 10,
            increment: 50,
        };

        let digits = extend_until_long_enough(PHI_60.len() + 40, &config, lossy);

        assert_eq!(attempts.into_inner(), vec![110, 160, 210]);
        assert_eq!(digits, compute_digits(100, &EngineConfig::default()));
        assert!(digits.starts_with(PHI_60));
    }

    #[test]
    fn scaled_phi_is_floor() {
        assert_eq!(scaled_phi(0), BigUint::from(1u32));
        assert_eq!(scaled_phi(1), BigUint::from(16u32));
        assert_eq!(scaled_phi(4), BigUint::from(16180u32));
    }
}
