/// Boundary records exchanged with the host.
///
/// Numbers cross the boundary as base-10 strings of 18-decimal fixed-point
/// integers, so every numeric field here is a `String`. Field names follow the
/// host's camelCase spelling. Conversion into typed state happens in
/// `strata-core`; these records only describe the wire shape.

use serde::{Deserialize, Serialize};

use crate::errors::StrataError;
use crate::StrataResult;

// ============================================================================
// Pool Configuration Record
// ============================================================================

/// Fee schedule as supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesRecord {
    pub curve: String,
    pub flat: String,
    #[serde(rename = "governanceLP")]
    pub governance_lp: String,
    pub governance_zombie: String,
}

/// Immutable pool configuration as supplied by the host
///
/// Addresses and linker fields the host may send along (`baseToken`,
/// `governance`, ...) are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfigRecord {
    pub initial_share_price: String,
    pub minimum_share_reserves: String,
    pub minimum_transaction_amount: String,
    pub time_stretch: String,
    pub position_duration: String,
    pub checkpoint_duration: String,
    pub fees: FeesRecord,
}

// ============================================================================
// Pool Info Record
// ============================================================================

/// Snapshot of the pool's mutable reserves as supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfoRecord {
    pub share_reserves: String,
    /// Signed: may carry a leading `-`
    pub share_adjustment: String,
    pub zombie_share_reserves: String,
    pub bond_reserves: String,
    pub lp_total_supply: String,
    pub share_price: String,
    pub longs_outstanding: String,
    pub long_average_maturity_time: String,
    pub shorts_outstanding: String,
    pub short_average_maturity_time: String,
    pub long_exposure: String,
    #[serde(default = "zero_string")]
    pub withdrawal_shares_ready_to_withdraw: String,
    #[serde(default = "zero_string")]
    pub withdrawal_shares_proceeds: String,
    #[serde(default = "zero_string")]
    pub lp_share_price: String,
}

fn zero_string() -> String {
    "0".to_string()
}

impl PoolConfigRecord {
    /// Parse a JSON object with the host's field names
    pub fn from_json_str(content: &str) -> StrataResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| StrataError::malformed("poolConfig", "<json>", &e.to_string()))
    }

    /// Parse a TOML table with the host's field names
    pub fn from_toml_str(content: &str) -> StrataResult<Self> {
        toml::from_str(content)
            .map_err(|e| StrataError::malformed("poolConfig", "<toml>", &e.to_string()))
    }
}

impl PoolInfoRecord {
    /// Parse a JSON object with the host's field names
    pub fn from_json_str(content: &str) -> StrataResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| StrataError::malformed("poolInfo", "<json>", &e.to_string()))
    }

    /// Parse a TOML table with the host's field names
    pub fn from_toml_str(content: &str) -> StrataResult<Self> {
        toml::from_str(content)
            .map_err(|e| StrataError::malformed("poolInfo", "<toml>", &e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const CONFIG_JSON: &str = r#"{
        "baseToken": "0x0000000000000000000000000000000000000000",
        "fees": {
            "curve": "100000000000000000",
            "flat": "500000000000000",
            "governanceLP": "10000000000000000",
            "governanceZombie": "100000000000000000"
        },
        "initialSharePrice": "1000000000000000000",
        "minimumShareReserves": "10000000000000000000",
        "minimumTransactionAmount": "1000000000000000",
        "timeStretch": "44463125629060298",
        "positionDuration": "604800",
        "checkpointDuration": "3600"
    }"#;

    #[test]
    fn test_config_record_from_json() {
        let record = PoolConfigRecord::from_json_str(CONFIG_JSON).unwrap();
        assert_eq!(record.time_stretch, "44463125629060298");
        assert_eq!(record.fees.governance_lp, "10000000000000000");
        assert_eq!(record.checkpoint_duration, "3600");
    }

    #[test]
    fn test_config_record_from_toml() {
        let content = r#"
            initialSharePrice = "1000000000000000000"
            minimumShareReserves = "10000000000000000000"
            minimumTransactionAmount = "1000000000000000"
            timeStretch = "44463125629060298"
            positionDuration = "604800"
            checkpointDuration = "3600"

            [fees]
            curve = "100000000000000000"
            flat = "500000000000000"
            governanceLP = "10000000000000000"
            governanceZombie = "100000000000000000"
        "#;
        let record = PoolConfigRecord::from_toml_str(content).unwrap();
        assert_eq!(record, PoolConfigRecord::from_json_str(CONFIG_JSON).unwrap());
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = PoolInfoRecord::from_json_str(r#"{ "shareReserves": "1" }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_info_record_optional_fields_default_to_zero() {
        let content = r#"{
            "shareReserves": "10000000000000000000000000",
            "shareAdjustment": "0",
            "zombieShareReserves": "0",
            "bondReserves": "10217899519533796120000000",
            "lpTotalSupply": "9999990000000000000000000",
            "sharePrice": "1000000000000000000",
            "longsOutstanding": "0",
            "longAverageMaturityTime": "0",
            "shortsOutstanding": "0",
            "shortAverageMaturityTime": "0",
            "longExposure": "0"
        }"#;
        let record = PoolInfoRecord::from_json_str(content).unwrap();
        assert_eq!(record.withdrawal_shares_proceeds, "0");
        assert_eq!(record.lp_share_price, "0");
    }
}
