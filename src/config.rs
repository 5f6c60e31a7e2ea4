use serde::Deserialize;

/// Construction-time configuration for the oracle.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Identity allowed to mutate the verifier registries.
    pub admin: String,

    /// Wire-format DS records that anchor every chain of trust.
    pub anchors: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let config: OracleConfig =
            serde_json::from_str(r#"{"admin": "ops", "anchors": [0, 0, 43]}"#).unwrap();
        assert_eq!(config.admin, "ops");
        assert_eq!(config.anchors, vec![0, 0, 43]);
    }
}
