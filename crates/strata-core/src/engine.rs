//! # Engine Handle
//!
//! The host-facing surface. `Engine::init` runs once per process; the handle
//! it returns is cheap to clone and can be shared across threads. Every call
//! takes the host's string records, converts them before doing any math, and
//! returns the result as a base-10 string of the raw fixed-point integer.

use std::sync::Arc;

use strata_math::FixedPoint;
use strata_types::{PoolConfigRecord, PoolInfoRecord, StrataError, StrataResult};

use crate::checkpoint;
use crate::config::{parse_seconds, PoolConfig};
use crate::pricing;
use crate::settings::EngineSettings;
use crate::short::{quote_open_short, OpenShortQuote, OpenShortRequest};
use crate::state::PoolState;

/// Initialized pricing engine
#[derive(Debug, Clone)]
pub struct Engine {
    settings: Arc<EngineSettings>,
}

impl Engine {
    /// Validate `settings`, install the logger, and return a ready handle
    ///
    /// Installing the logger is skipped when another logger already owns the
    /// process, so calling `init` more than once is harmless.
    pub fn init(settings: EngineSettings) -> StrataResult<Self> {
        settings.validate()?;

        if settings.install_logger {
            let installed = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(settings.log_filter.as_str()),
            )
            .try_init();
            if installed.is_err() {
                log::debug!("Logger already installed, keeping the existing one");
            }
        }

        log::info!(
            "Strata engine initialized (reject_above_par={})",
            settings.reject_above_par
        );

        Ok(Self {
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Spot price of a bond in base
    pub fn spot_price(&self, info: &PoolInfoRecord, config: &PoolConfigRecord) -> StrataResult<String> {
        let (state, config) = decode(info, config)?;
        let price = self.checked_spot_price(&state, &config)?;
        log::debug!("spot_price: z={} y={} -> {}", state.share_reserves, state.bond_reserves, price);
        Ok(price.to_string())
    }

    /// Annualized rate implied by the spot price
    pub fn spot_rate(&self, info: &PoolInfoRecord, config: &PoolConfigRecord) -> StrataResult<String> {
        let (state, config) = decode(info, config)?;
        let price = self.checked_spot_price(&state, &config)?;
        let rate = pricing::calculate_rate_given_fixed_price(price, config.position_duration)?;
        log::debug!("spot_rate: price={} -> {}", price.to_decimal(), rate.to_decimal());
        Ok(rate.to_string())
    }

    /// Base deposit required to short `bond_amount` bonds
    pub fn calc_open_short(
        &self,
        info: &PoolInfoRecord,
        config: &PoolConfigRecord,
        bond_amount: &str,
    ) -> StrataResult<String> {
        let request = OpenShortRequest::new(FixedPoint::parse("bondAmount", bond_amount)?);
        self.quote(info, config, &request).map(|quote| quote.base_deposit.to_string())
    }

    /// Base deposit required to short `bond_amount` bonds against a
    /// checkpoint whose share price was `open_share_price`
    pub fn calc_open_short_at(
        &self,
        info: &PoolInfoRecord,
        config: &PoolConfigRecord,
        bond_amount: &str,
        open_share_price: &str,
    ) -> StrataResult<String> {
        let request = OpenShortRequest::new(FixedPoint::parse("bondAmount", bond_amount)?)
            .with_open_share_price(FixedPoint::parse("openSharePrice", open_share_price)?);
        self.quote(info, config, &request).map(|quote| quote.base_deposit.to_string())
    }

    /// Full open-short breakdown
    pub fn quote_open_short(
        &self,
        info: &PoolInfoRecord,
        config: &PoolConfigRecord,
        request: &OpenShortRequest,
    ) -> StrataResult<OpenShortQuote> {
        self.quote(info, config, request)
    }

    /// Start of the checkpoint containing `time` (seconds)
    pub fn to_checkpoint(&self, config: &PoolConfigRecord, time: &str) -> StrataResult<String> {
        let config = PoolConfig::try_from(config)?;
        let time = parse_seconds("time", time)?;
        checkpoint::to_checkpoint(&config, time).map(|checkpoint| checkpoint.to_string())
    }

    fn quote(
        &self,
        info: &PoolInfoRecord,
        config: &PoolConfigRecord,
        request: &OpenShortRequest,
    ) -> StrataResult<OpenShortQuote> {
        let (state, config) = decode(info, config)?;
        let quote = quote_open_short(&state, &config, request)?;
        log::debug!(
            "calc_open_short: dy={} -> base={} (curve_fee={}, flat_fee={})",
            request.bond_amount,
            quote.base_deposit,
            quote.curve_fee,
            quote.flat_fee
        );
        Ok(quote)
    }

    fn checked_spot_price(&self, state: &PoolState, config: &PoolConfig) -> StrataResult<FixedPoint> {
        let price = pricing::spot_price(state, config)?;
        if self.settings().reject_above_par && price > FixedPoint::ONE {
            log::warn!("Spot price {} is above par", price.to_decimal());
            return Err(StrataError::degenerate_curve("spot price above par"));
        }
        Ok(price)
    }
}

/// Convert both host records, config first
fn decode(info: &PoolInfoRecord, config: &PoolConfigRecord) -> StrataResult<(PoolState, PoolConfig)> {
    let config = PoolConfig::try_from(config)?;
    let state = PoolState::try_from(info)?;
    Ok((state, config))
}
