//! Grouped prevalence: per-state (weighted) mean of a tri-state indicator.

use std::collections::BTreeMap;

use crate::prevalence::utility::round3;

/// Numerator/denominator accumulator for one group.
#[derive(Debug, Default)]
struct GroupAccumulator {
    weighted_positive: f64,
    weight_sum: f64,
}

impl GroupAccumulator {
    fn push(&mut self, positive: bool, weight: f64) {
        if positive {
            self.weighted_positive += weight;
        }
        self.weight_sum += weight;
    }

    /// Prevalence percentage, or `None` when no usable record reached this
    /// group. A group that only ever saw missing indicators or non-positive
    /// weights reports missing, never zero.
    fn percentage(&self) -> Option<f64> {
        if self.weight_sum > 0.0 {
            Some(round3(self.weighted_positive / self.weight_sum * 100.0))
        } else {
            None
        }
    }
}

/// Computes one prevalence percentage per distinct group key.
///
/// `groups`, `indicator`, and (when present) `weights` are aligned by record
/// position. With `weights` absent every usable record counts equally; with
/// weights present, records whose weight is missing or non-positive are
/// excluded from both numerator and denominator. Weights are used as-is and
/// need not sum to one.
///
/// The returned map iterates in ascending group-key order. Every group key
/// observed in the input gets an entry, even when its value is missing.
pub fn grouped_prevalence(
    groups: &[Option<u32>],
    indicator: &[Option<bool>],
    weights: Option<&[Option<f64>]>,
) -> BTreeMap<u32, Option<f64>> {
    let mut accumulators: BTreeMap<u32, GroupAccumulator> = BTreeMap::new();

    for (i, group) in groups.iter().enumerate() {
        let Some(key) = group else { continue };
        let acc = accumulators.entry(*key).or_default();

        let Some(positive) = indicator.get(i).copied().flatten() else {
            continue;
        };

        let weight = match weights {
            None => 1.0,
            Some(ws) => match ws.get(i).copied().flatten() {
                Some(w) if w > 0.0 => w,
                _ => continue,
            },
        };

        acc.push(positive, weight);
    }

    accumulators
        .into_iter()
        .map(|(key, acc)| (key, acc.percentage()))
        .collect()
}
