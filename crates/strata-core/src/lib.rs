//! # Strata Core - YieldSpace Pricing
//!
//! Deterministic pricing for a fixed-rate AMM built on the YieldSpace
//! invariant. It provides:
//!
//! - Pool configuration and reserve snapshots parsed from host records
//! - The YieldSpace curve in all four trade directions
//! - Spot price, spot rate and rate calibration helpers
//! - Trade bounds and pool solvency
//! - Open-short cost with its fee breakdown
//! - The `Engine` handle exposing all of the above over decimal strings
//!
//! Every function here is pure. Nothing is cached between calls.

pub mod checkpoint;
pub mod config;
pub mod engine;
pub mod pricing;
pub mod settings;
pub mod short;
pub mod state;
pub mod yield_space;

// Re-export commonly used items
pub use checkpoint::{flat_fee_proration, maturity_time, time_remaining_scaled, to_checkpoint};
pub use config::{Fees, PoolConfig};
pub use engine::Engine;
pub use pricing::{
    annualized_duration, calculate_bonds_given_shares_and_rate, calculate_rate_given_fixed_price,
    calculate_time_stretch, max_spot_price, spot_price, spot_rate,
};
pub use settings::EngineSettings;
pub use short::{calculate_open_short, quote_open_short, OpenShortQuote, OpenShortRequest};
pub use state::PoolState;
pub use yield_space::{max_sell, share_reserves_delta, YieldSpace};

pub use strata_math::FixedPoint;
pub use strata_types::{ErrorKind, PoolConfigRecord, PoolInfoRecord, StrataError, StrataResult};
