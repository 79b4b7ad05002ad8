use std::env;

/// Upper bound for any denial-log read, whatever the caller asks for.
pub const MAX_READ_LIMIT: i64 = 500;

/// Backend that receives authorization denial records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditStoreKind {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct AuditConfig {
    pub store: AuditStoreKind,
    pub default_limit: i64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            store: AuditStoreKind::Postgres,
            default_limit: 50,
        }
    }
}

impl AuditConfig {
    pub fn from_env() -> Self {
        let store = match env::var("AUDIT_STORE")
            .map(|v| v.trim().to_lowercase())
            .as_deref()
        {
            Ok("memory") => AuditStoreKind::Memory,
            _ => AuditStoreKind::Postgres,
        };

        Self {
            store,
            default_limit: env::var("AUDIT_DEFAULT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }

    /// Resolve a caller-supplied read limit into the range `1..=MAX_READ_LIMIT`.
    pub fn clamp_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, MAX_READ_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        let config = AuditConfig::default();
        assert_eq!(config.clamp_limit(None), 50);
        assert_eq!(config.clamp_limit(Some(0)), 1);
        assert_eq!(config.clamp_limit(Some(-4)), 1);
        assert_eq!(config.clamp_limit(Some(20)), 20);
        assert_eq!(config.clamp_limit(Some(10_000)), MAX_READ_LIMIT);
    }
}
