use soroban_sdk::{symbol_short, Address, Env};

use crate::FarmConfig;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the farm is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub rewards_per_second: i128,
    pub start_time: u64,
    pub deposit_fee_bps: i128,
    pub harvest_fee_bps: i128,
    pub timestamp: u64,
}

/// Fired when a new pool is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub staked_asset: Address,
    pub weight: i128,
    pub timestamp: u64,
}

/// Fired when a pool's allocation weight changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pool_id: u32,
    pub weight: i128,
    pub timestamp: u64,
}

/// Fired when the admin changes the global emission rate.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateSetEvent {
    pub new_rate: i128,
    pub timestamp: u64,
}

/// Fired when the fee receiver is rerouted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeReceiverSetEvent {
    pub new_receiver: Address,
    pub timestamp: u64,
}

/// Fired when a user deposits stake. `net` is the credited amount after
/// the deposit fee.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub gross: i128,
    pub net: i128,
    pub timestamp: u64,
}

/// Fired when a user withdraws stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a user bails out without reward settlement.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawnEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired whenever pending reward is paid out. `amount` is what the user
/// received, `fee` what went to the fee receiver.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub fee: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, cfg: &FarmConfig) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin: cfg.admin.clone(),
            reward_token: cfg.reward_token.clone(),
            rewards_per_second: cfg.rewards_per_second,
            start_time: cfg.start_time,
            deposit_fee_bps: cfg.deposit_fee_bps,
            harvest_fee_bps: cfg.harvest_fee_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_added(env: &Env, pool_id: u32, staked_asset: Address, weight: i128) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pool_id),
        PoolAddedEvent {
            pool_id,
            staked_asset,
            weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_weight_set(env: &Env, pool_id: u32, weight: i128) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pool_id),
        PoolWeightSetEvent {
            pool_id,
            weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emission_rate_set(env: &Env, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_SET"),),
        EmissionRateSetEvent {
            new_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_fee_receiver_set(env: &Env, new_receiver: Address) {
    env.events().publish(
        (symbol_short!("FEE_RCV"),),
        FeeReceiverSetEvent {
            new_receiver,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(env: &Env, pool_id: u32, staker: &Address, gross: i128, net: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), staker.clone()),
        DepositedEvent {
            pool_id,
            staker: staker.clone(),
            gross,
            net,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, pool_id: u32, staker: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), staker.clone()),
        WithdrawnEvent {
            pool_id,
            staker: staker.clone(),
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdrawn(env: &Env, pool_id: u32, staker: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("EMERGENCY"), staker.clone()),
        EmergencyWithdrawnEvent {
            pool_id,
            staker: staker.clone(),
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, pool_id: u32, staker: &Address, amount: i128, fee: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), staker.clone()),
        RewardPaidEvent {
            pool_id,
            staker: staker.clone(),
            amount,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}
