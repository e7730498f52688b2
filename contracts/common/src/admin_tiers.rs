//! Tiered admin authorization shared by the farm contracts.
//!
//! The engines never decide authorization themselves; they ask this module
//! whether a caller holds a sufficient tier before touching pool weights,
//! emission rates, or fee routing.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const ADMIN_TIER_PREFIX: Symbol = symbol_short!("ADM_TIER");
const SUPER_ADMIN: Symbol = symbol_short!("S_ADMIN");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Admin tier enum ──────────────────────────────────────────────────────────

/// Three-tier admin hierarchy.
///
/// - `SuperAdmin`    – Full control, including promoting/demoting admins.
/// - `ContractAdmin` – May reconfigure the farm (pools, rates, fee routing)
///                     but cannot change who is an admin.
/// - `OperatorAdmin` – Reserved for operational toggles only.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    OperatorAdmin = 1,
    ContractAdmin = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    /// Numeric rank used for tier comparison.
    pub fn rank(&self) -> u32 {
        match self {
            AdminTier::OperatorAdmin => 1,
            AdminTier::ContractAdmin => 2,
            AdminTier::SuperAdmin => 3,
        }
    }

    /// True if this tier is at least as high as `min_tier`.
    pub fn has_at_least(&self, min_tier: &AdminTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn admin_tier_key(admin: &Address) -> (Symbol, Address) {
    (ADMIN_TIER_PREFIX, admin.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Core functions ───────────────────────────────────────────────────────────

/// Assigns an admin tier to the given address.
/// Only callable internally — callers must verify authorization beforehand.
pub fn set_admin_tier(env: &Env, admin: &Address, tier: AdminTier) {
    let key = admin_tier_key(admin);
    env.storage().persistent().set(&key, &tier);
    extend_ttl(env, &key);
}

/// Retrieves the admin tier of a given address, if any.
pub fn get_admin_tier(env: &Env, admin: &Address) -> Option<AdminTier> {
    let key = admin_tier_key(admin);
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        extend_ttl(env, &key);
    }
    tier
}

/// Removes the admin tier from a given address.
pub fn remove_admin_tier(env: &Env, admin: &Address) {
    let key = admin_tier_key(admin);
    env.storage().persistent().remove(&key);
}

/// Returns `false` if the caller has no admin tier or their tier is below
/// the required minimum.
pub fn require_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> bool {
    match get_admin_tier(env, caller) {
        Some(tier) => tier.has_at_least(min_tier),
        None => false,
    }
}

// ── SuperAdmin bootstrap ─────────────────────────────────────────────────────

/// Sets the initial super admin during contract initialization.
/// This also assigns them the SuperAdmin tier.
pub fn set_super_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&SUPER_ADMIN, admin);
    set_admin_tier(env, admin, AdminTier::SuperAdmin);
}

/// Returns the primary super admin address, if set.
pub fn get_super_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&SUPER_ADMIN)
}

// ── Promote / demote ─────────────────────────────────────────────────────────

/// Promotes or assigns an admin to the specified tier.
///
/// Only a `SuperAdmin` may call this. The caller must have already been
/// authenticated via `require_auth()`.
///
/// Returns `true` on success, `false` if the caller is not a SuperAdmin.
pub fn promote_admin(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    set_admin_tier(env, target, tier);
    true
}

/// Demotes (removes) an admin's tier entirely.
///
/// Only a `SuperAdmin` may call this. The caller must have already been
/// authenticated via `require_auth()`.
///
/// Returns `true` on success, `false` if the caller is not a SuperAdmin.
pub fn demote_admin(env: &Env, caller: &Address, target: &Address) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    remove_admin_tier(env, target);
    true
}
