//! Fixed-point reward-accrual arithmetic.
//!
//! Accumulated-reward-per-share values are scaled by [`ACC_SCALE`] (1e12).
//! Every helper returns `None` when an intermediate product would overflow
//! `i128`, so callers fail closed instead of wrapping. Every division
//! truncates toward zero; the resulting dust stays in the pool's reserve
//! and is bounded by one unit per settlement per depositor.

/// Scale factor for `acc_reward_per_share` accumulators.
pub const ACC_SCALE: i128 = 1_000_000_000_000;

/// Denominator for basis-point fee math (50 bps = 0.5%).
pub const BPS_DENOM: i128 = 10_000;

/// Reward emitted to one pool over `elapsed` seconds.
///
/// `elapsed * rate * alloc_point / total_alloc_point`, truncating.
/// A zero `total_alloc_point` means no pool earns this token; the emission
/// for the interval is zero rather than a division error.
pub fn pool_emission(
    elapsed: u64,
    rate: i128,
    alloc_point: i128,
    total_alloc_point: i128,
) -> Option<i128> {
    if total_alloc_point == 0 {
        return Some(0);
    }
    (elapsed as i128)
        .checked_mul(rate)?
        .checked_mul(alloc_point)?
        .checked_div(total_alloc_point)
}

/// Increment to a pool's per-share accumulator for `emitted` new reward.
///
/// Zero when nothing is staked: the interval's emission is forfeited, not
/// banked for the next depositor.
pub fn per_share_delta(emitted: i128, total_staked: i128) -> Option<i128> {
    if total_staked <= 0 {
        return Some(0);
    }
    emitted.checked_mul(ACC_SCALE)?.checked_div(total_staked)
}

/// Reward already accounted for at `acc_per_share` for a stake of `amount`.
///
/// Stored as the user's reward debt after every settlement.
pub fn reward_debt(amount: i128, acc_per_share: i128) -> Option<i128> {
    amount.checked_mul(acc_per_share)?.checked_div(ACC_SCALE)
}

/// Reward owed to a user since their last settlement.
pub fn pending(amount: i128, acc_per_share: i128, debt: i128) -> Option<i128> {
    reward_debt(amount, acc_per_share)?.checked_sub(debt)
}

/// Split `amount` into `(fee, net)` for a basis-point fee.
///
/// The fee truncates, so the payer keeps the rounding remainder.
pub fn fee_split(amount: i128, fee_bps: i128) -> Option<(i128, i128)> {
    let fee = amount.checked_mul(fee_bps)?.checked_div(BPS_DENOM)?;
    let net = amount.checked_sub(fee)?;
    Some((fee, net))
}
