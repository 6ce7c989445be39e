// Copyright (c) 2026 Joseph Verdicchio and btpe-count Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parameter grid: trial sizes and the success probabilities tested for each.

/// Doubling stops once `p` reaches this; the slack keeps 0.5 itself in the
/// grid when repeated doubling lands a hair above it.
const HALF_WITH_SLACK: f64 = 0.500001;

/// Smallest `n * p` at which BTPE is selected over inversion.
const MIN_RELEVANT_MEAN: f64 = 10.0;

/// First doubling step, the power of two just above [`MIN_RELEVANT_MEAN`].
const FIRST_STEP_MEAN: f64 = 16.0;

/// Probabilities worth testing for `n` trials, symmetric around 0.5.
///
/// The list opens with `10/n`, continues with `16/n, 32/n, ...` up to 0.5,
/// then mirrors every earlier value except the last as `1 - v`, in reverse.
/// When `16/n` is already past 0.5 the list holds only `10/n`, and that value
/// is mirrored. Pure and total for every `n > 0`.
pub fn probabilities_for(n: u64) -> Vec<f64> {
    let n = n as f64;
    let mut values = vec![MIN_RELEVANT_MEAN / n];

    let mut p = FIRST_STEP_MEAN / n;
    while p < HALF_WITH_SLACK {
        values.push(p);
        p *= 2.0;
    }

    let mirrored = (values.len() - 1).max(1);
    for i in (0..mirrored).rev() {
        values.push(1.0 - values[i]);
    }
    values
}

/// `min_n, 2*min_n, 4*min_n, ...` up to and including the last value not
/// above `max_n`. Empty when `min_n` is zero or above `max_n`.
pub fn trial_sizes(min_n: u64, max_n: u64) -> impl Iterator<Item = u64> {
    let first = (min_n > 0 && min_n <= max_n).then_some(min_n);
    std::iter::successors(first, move |&n| n.checked_mul(2).filter(|&next| next <= max_n))
}
