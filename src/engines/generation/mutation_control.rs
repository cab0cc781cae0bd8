use crate::config::evolution::AdaptiveRateConfig;
use crate::error::MidiEvoError;
use log::info;

/// Spread of the population's fitness at one point in time.
///
/// `variance_centi` and `cv_percent` are fixed-point values rounded half-up:
/// the variance in hundredths, the coefficient of variation in percent
/// (two decimals of the ratio), so the adaptation does not depend on how the
/// platform rounds floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub count: usize,
    pub mean: f64,
    pub variance_centi: u128,
    pub std_dev: f64,
    pub cv_percent: u64,
}

/// `round_half_up(numerator / denominator)` for a signed numerator and a
/// positive denominator.
fn div_round_half_up(numerator: i128, denominator: i128) -> Option<i128> {
    let twice = numerator.checked_mul(2)?.checked_add(denominator)?;
    Some(twice.div_euclid(denominator.checked_mul(2)?))
}

fn overflow() -> MidiEvoError {
    MidiEvoError::Arithmetic("population fitness statistics overflowed u128".to_string())
}

impl FitnessStats {
    /// Sample statistics (`n - 1` denominator) of a fitness column.
    ///
    /// Fewer than two values, or a zero mean, report a coefficient of zero.
    pub fn from_values(values: &[u128]) -> Result<Self, MidiEvoError> {
        let count = values.len();
        let n = count as u128;
        let sum = values
            .iter()
            .try_fold(0u128, |acc, &v| acc.checked_add(v))
            .ok_or_else(overflow)?;
        let mean = if count == 0 { 0.0 } else { sum as f64 / count as f64 };

        if count < 2 {
            return Ok(Self {
                count,
                mean,
                variance_centi: 0,
                std_dev: 0.0,
                cv_percent: 0,
            });
        }

        // Deviations are taken from the integer part of the mean, q = sum / n,
        // with r = sum % n. Then sum((x - mean)^2) = S - r^2 / n where
        // S = sum((x - q)^2), so variance = (n * S - r^2) / (n * (n - 1)).
        let q = sum / n;
        let r = sum % n;
        let mut squares = 0u128;
        for &value in values {
            let deviation = value.abs_diff(q);
            let square = deviation.checked_mul(deviation).ok_or_else(overflow)?;
            squares = squares.checked_add(square).ok_or_else(overflow)?;
        }

        // Split S = (n - 1) * whole + rest so n * S is never formed:
        // variance = whole + (n * rest - r^2) / (n * (n - 1)).
        let whole = squares / (n - 1);
        let rest = squares % (n - 1);
        let small = |x: u128| i128::try_from(x).map_err(|_| overflow());
        let denominator = small(n)?
            .checked_mul(small(n - 1)?)
            .ok_or_else(overflow)?;
        let fraction = small(n)?
            .checked_mul(small(rest)?)
            .zip(small(r)?.checked_mul(small(r)?))
            .and_then(|(a, b)| a.checked_sub(b))
            .and_then(|numerator| numerator.checked_mul(100))
            .and_then(|numerator| div_round_half_up(numerator, denominator))
            .ok_or_else(overflow)?;
        let variance_centi = whole
            .checked_mul(100)
            .and_then(|centi| i128::try_from(centi).ok())
            .and_then(|centi| centi.checked_add(fraction))
            .and_then(|centi| u128::try_from(centi).ok())
            .ok_or_else(overflow)?;

        let std_dev = (variance_centi as f64 / 100.0).sqrt();
        let cv_percent = if sum == 0 {
            0
        } else {
            (std_dev * 100.0 / mean + 0.5).floor() as u64
        };

        Ok(Self {
            count,
            mean,
            variance_centi,
            std_dev,
            cv_percent,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateChange {
    Increased { from: f64, to: f64 },
    Decreased { from: f64, to: f64 },
    Unchanged,
}

/// Keeps the mutation rate inside a target diversity band.
///
/// Every `check_interval` generations the population's coefficient of
/// variation is compared with two thresholds: below the low one the rate
/// rises by `step` (capped at `max_rate`), above the high one it falls by
/// `step` and snaps to zero once below `min_rate`. A step that cannot move
/// the rate any further reports `Unchanged`.
#[derive(Debug, Clone)]
pub struct MutationController {
    config: AdaptiveRateConfig,
    rate: f64,
}

impl MutationController {
    pub fn new(config: AdaptiveRateConfig, initial_rate: f64) -> Self {
        Self {
            config,
            rate: initial_rate,
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Whether the check runs after `generation` (1-based count of completed
    /// generations). The first check follows generation `check_interval + 1`.
    pub fn is_due(&self, generation: usize) -> bool {
        let interval = self.config.check_interval;
        interval > 0 && generation > 1 && (generation - 1) % interval == 0
    }

    pub fn adjust(&mut self, stats: &FitnessStats) -> RateChange {
        let cv = stats.cv_percent as f64;
        let from = self.rate;

        if cv < self.config.low_threshold {
            let to = (from + self.config.step).min(self.config.max_rate);
            if to == from {
                return RateChange::Unchanged;
            }
            self.rate = to;
            RateChange::Increased { from, to }
        } else if cv > self.config.high_threshold {
            let mut to = from - self.config.step;
            if to < self.config.min_rate {
                to = 0.0;
            }
            if to == from {
                return RateChange::Unchanged;
            }
            self.rate = to;
            RateChange::Decreased { from, to }
        } else {
            RateChange::Unchanged
        }
    }

    /// Measure the whole population and adjust the rate.
    pub fn evaluate(&mut self, fitness_values: &[u128]) -> Result<RateChange, MidiEvoError> {
        let stats = FitnessStats::from_values(fitness_values)?;
        let change = self.adjust(&stats);
        match change {
            RateChange::Increased { from, to } | RateChange::Decreased { from, to } => {
                info!(
                    "Mutation rate {:.2}% -> {:.2}% (cv {}%, mean {:.2})",
                    from * 100.0,
                    to * 100.0,
                    stats.cv_percent,
                    stats.mean
                );
            }
            RateChange::Unchanged => {}
        }
        Ok(change)
    }
}
