#![no_std]

pub mod events;

use common::accrual;
use common::admin_tiers::{self, AdminTier};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const POOL_CTR: Symbol = symbol_short!("POOL_CTR");
const POOL: Symbol = symbol_short!("POOL");
const USER: Symbol = symbol_short!("USER");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    PoolNotFound = 5,
    DuplicateAsset = 6,
    InsufficientStake = 7,
    ArithmeticOverflow = 8,
}

// ── Types ────────────────────────────────────────────────────────────────────

/// Global farm configuration, written once at `initialize` and mutated only
/// by admin operations.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmConfig {
    /// Bootstrap admin; also the initial fee receiver.
    pub admin: Address,
    /// Token contract the farm emits as rewards.
    pub reward_token: Address,
    /// Reward tokens emitted per second across all pools.
    pub rewards_per_second: i128,
    /// Emission begins at this ledger timestamp; accrual before it is zero.
    pub start_time: u64,
    /// Fee charged on the deposit leg, in basis points.
    pub deposit_fee_bps: i128,
    /// Fee charged on every reward payout, in basis points.
    pub harvest_fee_bps: i128,
    /// Receiver of both deposit and harvest fees.
    pub fee_receiver: Address,
    /// Sum of all pools' allocation weights.
    pub total_alloc_point: i128,
}

/// Per-pool accrual state. One pool per staked asset, never removed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    /// Token contract this pool accepts. Immutable after `add_pool`.
    pub staked_asset: Address,
    /// This pool's share of the emission, relative to `total_alloc_point`.
    pub alloc_point: i128,
    /// Last timestamp the accumulator was brought current. Never decreases.
    pub last_accrual_time: u64,
    /// Cumulative reward per staked unit, scaled by `accrual::ACC_SCALE`.
    /// Never decreases.
    pub acc_reward_per_share: i128,
    /// Sum of all users' net staked amounts resident in this pool.
    pub total_staked: i128,
}

/// Per-user per-pool position. Created lazily on first deposit; a fully
/// withdrawn position stays at zero rather than being deleted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserPosition {
    /// Currently staked balance, net of the deposit fee.
    pub amount: i128,
    /// Reward already accounted for at the last settlement:
    /// `amount * acc_reward_per_share / ACC_SCALE` at that instant.
    pub reward_debt: i128,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn load_config(env: &Env) -> Result<FarmConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

fn save_config(env: &Env, cfg: &FarmConfig) {
    env.storage().instance().set(&CONFIG, cfg);
}

fn pool_key(pool_id: u32) -> (Symbol, u32) {
    (POOL, pool_id)
}

fn user_key(pool_id: u32, user: &Address) -> (Symbol, u32, Address) {
    (USER, pool_id, user.clone())
}

fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_CTR).unwrap_or(0)
}

fn load_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
    env.storage()
        .persistent()
        .get(&pool_key(pool_id))
        .ok_or(ContractError::PoolNotFound)
}

fn save_pool(env: &Env, pool_id: u32, pool: &PoolInfo) {
    env.storage().persistent().set(&pool_key(pool_id), pool);
}

fn load_position(env: &Env, pool_id: u32, user: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&user_key(pool_id, user))
        .unwrap_or(UserPosition {
            amount: 0,
            reward_debt: 0,
        })
}

fn save_position(env: &Env, pool_id: u32, user: &Address, position: &UserPosition) {
    env.storage()
        .persistent()
        .set(&user_key(pool_id, user), position);
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct FarmContract;

#[contractimpl]
impl FarmContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the farm.
    ///
    /// * `reward_token`       – token contract the farm pays rewards in.
    /// * `rewards_per_second` – global emission across all pools.
    /// * `start_time`         – emission begins at this timestamp.
    /// * `deposit_fee_bps`    – fee on each deposit, in basis points.
    /// * `harvest_fee_bps`    – fee on each reward payout, in basis points.
    ///
    /// The fee receiver starts as `admin` and can be changed later via
    /// `set_fee_receiver`.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        rewards_per_second: i128,
        start_time: u64,
        deposit_fee_bps: i128,
        harvest_fee_bps: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if rewards_per_second < 0 {
            return Err(ContractError::InvalidInput);
        }
        if !(0..=accrual::BPS_DENOM).contains(&deposit_fee_bps)
            || !(0..=accrual::BPS_DENOM).contains(&harvest_fee_bps)
        {
            return Err(ContractError::InvalidInput);
        }

        let cfg = FarmConfig {
            admin: admin.clone(),
            reward_token,
            rewards_per_second,
            start_time,
            deposit_fee_bps,
            harvest_fee_bps,
            fee_receiver: admin.clone(),
            total_alloc_point: 0,
        };
        save_config(&env, &cfg);

        admin_tiers::set_super_admin(&env, &admin);

        events::publish_initialized(&env, &cfg);
        Ok(())
    }

    // ── Pool registry ───────────────────────────────────────────────────────

    /// Register a new pool for `staked_asset` with the given allocation
    /// weight. Zero-weight pools are valid (they simply earn nothing).
    ///
    /// With `update_all` set, every existing pool is settled under the old
    /// weight total before the new weight joins it, so past accrual is not
    /// repriced. Skipping the mass update is cheaper; unsettled pools then
    /// accrue the new total from their own stale `last_accrual_time`.
    pub fn add_pool(
        env: Env,
        caller: Address,
        weight: i128,
        staked_asset: Address,
        update_all: bool,
    ) -> Result<u32, ContractError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut cfg = load_config(&env)?;
        if weight < 0 {
            return Err(ContractError::InvalidInput);
        }

        let count = pool_count(&env);
        for id in 0..count {
            if load_pool(&env, id)?.staked_asset == staked_asset {
                return Err(ContractError::DuplicateAsset);
            }
        }

        if update_all {
            Self::settle_all(&env, &cfg)?;
        }

        cfg.total_alloc_point = cfg
            .total_alloc_point
            .checked_add(weight)
            .ok_or(ContractError::ArithmeticOverflow)?;
        save_config(&env, &cfg);

        let now = env.ledger().timestamp();
        let pool = PoolInfo {
            staked_asset: staked_asset.clone(),
            alloc_point: weight,
            last_accrual_time: now.max(cfg.start_time),
            acc_reward_per_share: 0,
            total_staked: 0,
        };
        save_pool(&env, count, &pool);
        env.storage().instance().set(&POOL_CTR, &(count + 1));

        events::publish_pool_added(&env, count, staked_asset, weight);
        Ok(count)
    }

    /// Change one pool's allocation weight, adjusting the global total by
    /// the delta. Same settle-before-change rule as `add_pool`.
    pub fn set_pool_weight(
        env: Env,
        caller: Address,
        pool_id: u32,
        weight: i128,
        update_all: bool,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut cfg = load_config(&env)?;
        if weight < 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut pool = load_pool(&env, pool_id)?;

        if update_all {
            Self::settle_all(&env, &cfg)?;
            pool = load_pool(&env, pool_id)?;
        }

        cfg.total_alloc_point = cfg
            .total_alloc_point
            .checked_sub(pool.alloc_point)
            .ok_or(ContractError::ArithmeticOverflow)?
            .checked_add(weight)
            .ok_or(ContractError::ArithmeticOverflow)?;
        pool.alloc_point = weight;

        save_config(&env, &cfg);
        save_pool(&env, pool_id, &pool);

        events::publish_pool_weight_set(&env, pool_id, weight);
        Ok(())
    }

    /// Change the global emission rate. With `update_all`, every pool is
    /// settled at the old rate first so the change only affects the future.
    pub fn set_emission_rate(
        env: Env,
        caller: Address,
        new_rate: i128,
        update_all: bool,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut cfg = load_config(&env)?;
        if new_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        if update_all {
            Self::settle_all(&env, &cfg)?;
        }

        cfg.rewards_per_second = new_rate;
        save_config(&env, &cfg);

        events::publish_emission_rate_set(&env, new_rate);
        Ok(())
    }

    /// Route future deposit and harvest fees to a new receiver.
    pub fn set_fee_receiver(
        env: Env,
        caller: Address,
        new_receiver: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut cfg = load_config(&env)?;
        cfg.fee_receiver = new_receiver.clone();
        save_config(&env, &cfg);

        events::publish_fee_receiver_set(&env, new_receiver);
        Ok(())
    }

    // ── User ledger ─────────────────────────────────────────────────────────

    /// Deposit `amount` of the pool's staked asset.
    ///
    /// The pool is settled and any pending reward paid out *before* the
    /// stake changes, so the new tokens never earn retroactively. The
    /// deposit fee is forwarded to the fee receiver and only the net amount
    /// is credited. `amount == 0` is the harvest idiom: settle and pay
    /// pending without touching the stake.
    pub fn deposit(
        env: Env,
        caller: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let cfg = load_config(&env)?;
        let mut pool = load_pool(&env, pool_id)?;
        Self::accrue(&env, &cfg, &mut pool)?;

        let mut position = load_position(&env, pool_id, &caller);
        Self::pay_pending(&env, &cfg, pool_id, &pool, &position, &caller)?;

        if amount > 0 {
            token::Client::new(&env, &pool.staked_asset).transfer(
                &caller,
                &env.current_contract_address(),
                &amount,
            );

            let (fee, net) = accrual::fee_split(amount, cfg.deposit_fee_bps)
                .ok_or(ContractError::ArithmeticOverflow)?;
            if fee > 0 {
                token::Client::new(&env, &pool.staked_asset).transfer(
                    &env.current_contract_address(),
                    &cfg.fee_receiver,
                    &fee,
                );
            }

            position.amount = position
                .amount
                .checked_add(net)
                .ok_or(ContractError::ArithmeticOverflow)?;
            pool.total_staked = pool
                .total_staked
                .checked_add(net)
                .ok_or(ContractError::ArithmeticOverflow)?;

            events::publish_deposited(&env, pool_id, &caller, amount, net);
        }

        position.reward_debt = accrual::reward_debt(position.amount, pool.acc_reward_per_share)
            .ok_or(ContractError::ArithmeticOverflow)?;

        save_pool(&env, pool_id, &pool);
        save_position(&env, pool_id, &caller, &position);
        Ok(())
    }

    /// Withdraw `amount` of staked asset after settling and paying pending
    /// reward. No fee applies on the withdrawal leg.
    pub fn withdraw(
        env: Env,
        caller: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let cfg = load_config(&env)?;
        let mut pool = load_pool(&env, pool_id)?;
        Self::accrue(&env, &cfg, &mut pool)?;

        let mut position = load_position(&env, pool_id, &caller);
        if amount > position.amount {
            return Err(ContractError::InsufficientStake);
        }

        Self::pay_pending(&env, &cfg, pool_id, &pool, &position, &caller)?;

        if amount > 0 {
            position.amount -= amount;
            pool.total_staked -= amount;
            token::Client::new(&env, &pool.staked_asset).transfer(
                &env.current_contract_address(),
                &caller,
                &amount,
            );
        }

        position.reward_debt = accrual::reward_debt(position.amount, pool.acc_reward_per_share)
            .ok_or(ContractError::ArithmeticOverflow)?;

        save_pool(&env, pool_id, &pool);
        save_position(&env, pool_id, &caller, &position);

        events::publish_withdrawn(&env, pool_id, &caller, amount);
        Ok(())
    }

    /// Return the caller's full net stake without settling rewards.
    ///
    /// All pending reward is forfeited. This path must never fail because
    /// of reward accounting, so it touches neither the accumulator nor the
    /// reward token.
    pub fn emergency_withdraw(
        env: Env,
        caller: Address,
        pool_id: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        load_config(&env)?;
        let mut pool = load_pool(&env, pool_id)?;
        let position = load_position(&env, pool_id, &caller);
        let amount = position.amount;

        pool.total_staked -= amount;
        save_pool(&env, pool_id, &pool);
        save_position(
            &env,
            pool_id,
            &caller,
            &UserPosition {
                amount: 0,
                reward_debt: 0,
            },
        );

        if amount > 0 {
            token::Client::new(&env, &pool.staked_asset).transfer(
                &env.current_contract_address(),
                &caller,
                &amount,
            );
        }

        events::publish_emergency_withdrawn(&env, pool_id, &caller, amount);
        Ok(())
    }

    // ── Accrual engine ──────────────────────────────────────────────────────

    /// Bring one pool's accumulator current. Anyone may call; the operation
    /// only advances state that every mutating entry point advances anyway.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<(), ContractError> {
        let cfg = load_config(&env)?;
        let mut pool = load_pool(&env, pool_id)?;
        Self::accrue(&env, &cfg, &mut pool)?;
        save_pool(&env, pool_id, &pool);
        Ok(())
    }

    /// Settle every pool. Gas cost grows with the pool count, which is why
    /// the admin mutations take `update_all` as an explicit choice.
    pub fn mass_update_pools(env: Env) -> Result<(), ContractError> {
        let cfg = load_config(&env)?;
        Self::settle_all(&env, &cfg)
    }

    /// Reward owed to `user` if settlement ran right now, gross of the
    /// harvest fee. Read-only: matches exactly what a `deposit`/`withdraw`
    /// at the same timestamp would pay.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> Result<i128, ContractError> {
        let cfg = load_config(&env)?;
        let pool = load_pool(&env, pool_id)?;
        let position = load_position(&env, pool_id, &user);

        let acc = Self::projected_acc(&env, &cfg, &pool)?;
        accrual::pending(position.amount, acc, position.reward_debt)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Snapshot of one pool's accrual state.
    pub fn get_pool(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        load_pool(&env, pool_id)
    }

    /// Snapshot of a user's position in one pool (zero if never deposited).
    pub fn get_user(env: Env, pool_id: u32, user: Address) -> UserPosition {
        load_position(&env, pool_id, &user)
    }

    pub fn get_pool_count(env: Env) -> u32 {
        pool_count(&env)
    }

    pub fn get_total_alloc_point(env: Env) -> Result<i128, ContractError> {
        Ok(load_config(&env)?.total_alloc_point)
    }

    pub fn get_rewards_per_second(env: Env) -> Result<i128, ContractError> {
        Ok(load_config(&env)?.rewards_per_second)
    }

    pub fn get_start_time(env: Env) -> Result<u64, ContractError> {
        Ok(load_config(&env)?.start_time)
    }

    pub fn get_fee_receiver(env: Env) -> Result<Address, ContractError> {
        Ok(load_config(&env)?.fee_receiver)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        Ok(load_config(&env)?.admin)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    // ── Admin tier management ───────────────────────────────────────────────

    /// Promotes or assigns a target address to the specified admin tier.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        load_config(&env)?;
        caller.require_auth();
        if !admin_tiers::promote_admin(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Removes the admin tier from the target address entirely.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        load_config(&env)?;
        caller.require_auth();
        if !admin_tiers::demote_admin(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Returns the admin tier of the given address, if any.
    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::get_admin_tier(&env, &admin)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    /// Guard: revert unless `caller` holds at least the ContractAdmin tier.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if admin_tiers::require_tier(env, caller, &AdminTier::ContractAdmin) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }

    /// Advance `pool`'s accumulator to the current timestamp.
    ///
    /// No-op when no time has elapsed — `last_accrual_time` starts at
    /// `max(now, start_time)`, so this also covers the pre-start window.
    /// With zero stake the interval's emission is skipped, not banked.
    /// Idempotent at a fixed timestamp.
    fn accrue(env: &Env, cfg: &FarmConfig, pool: &mut PoolInfo) -> Result<(), ContractError> {
        let now = env.ledger().timestamp();
        if now <= pool.last_accrual_time {
            return Ok(());
        }

        if pool.total_staked > 0 {
            let elapsed = now - pool.last_accrual_time;
            let emitted = accrual::pool_emission(
                elapsed,
                cfg.rewards_per_second,
                pool.alloc_point,
                cfg.total_alloc_point,
            )
            .ok_or(ContractError::ArithmeticOverflow)?;
            let delta = accrual::per_share_delta(emitted, pool.total_staked)
                .ok_or(ContractError::ArithmeticOverflow)?;
            pool.acc_reward_per_share = pool
                .acc_reward_per_share
                .checked_add(delta)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }
        pool.last_accrual_time = now;
        Ok(())
    }

    /// The accumulator value `accrue` would produce right now, without
    /// writing it back. Used by the read-only pending query.
    fn projected_acc(env: &Env, cfg: &FarmConfig, pool: &PoolInfo) -> Result<i128, ContractError> {
        let now = env.ledger().timestamp();
        if now <= pool.last_accrual_time || pool.total_staked == 0 {
            return Ok(pool.acc_reward_per_share);
        }
        let elapsed = now - pool.last_accrual_time;
        let emitted = accrual::pool_emission(
            elapsed,
            cfg.rewards_per_second,
            pool.alloc_point,
            cfg.total_alloc_point,
        )
        .ok_or(ContractError::ArithmeticOverflow)?;
        let delta = accrual::per_share_delta(emitted, pool.total_staked)
            .ok_or(ContractError::ArithmeticOverflow)?;
        pool.acc_reward_per_share
            .checked_add(delta)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Settle every registered pool under the current parameters.
    fn settle_all(env: &Env, cfg: &FarmConfig) -> Result<(), ContractError> {
        for id in 0..pool_count(env) {
            let mut pool = load_pool(env, id)?;
            Self::accrue(env, cfg, &mut pool)?;
            save_pool(env, id, &pool);
        }
        Ok(())
    }

    /// Pay out whatever `position` has pending against the settled `pool`.
    ///
    /// The harvest fee truncates; the user receives the remainder. The
    /// transfers come out of the contract's reward-token balance, so an
    /// underfunded reserve aborts the whole operation.
    fn pay_pending(
        env: &Env,
        cfg: &FarmConfig,
        pool_id: u32,
        pool: &PoolInfo,
        position: &UserPosition,
        to: &Address,
    ) -> Result<(), ContractError> {
        if position.amount == 0 {
            return Ok(());
        }
        let pending = accrual::pending(
            position.amount,
            pool.acc_reward_per_share,
            position.reward_debt,
        )
        .ok_or(ContractError::ArithmeticOverflow)?;
        if pending <= 0 {
            return Ok(());
        }

        let (fee, net) = accrual::fee_split(pending, cfg.harvest_fee_bps)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let reward = token::Client::new(env, &cfg.reward_token);
        if fee > 0 {
            reward.transfer(&env.current_contract_address(), &cfg.fee_receiver, &fee);
        }
        if net > 0 {
            reward.transfer(&env.current_contract_address(), to, &net);
        }

        events::publish_reward_paid(env, pool_id, to, net, fee);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
