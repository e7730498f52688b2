//! Shared utilities for the farm contract suite.
//!
//! This crate provides:
//! - [`accrual`] — fixed-point reward-accrual arithmetic used by both farm
//!   engines. All operations are checked (overflow fails closed) and every
//!   division truncates toward zero.
//! - [`admin_tiers`] — the tiered admin authorization layer that gates
//!   every administrative contract operation.

#![no_std]

pub mod accrual;
pub mod admin_tiers;
