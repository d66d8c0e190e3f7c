use std::collections::HashMap;

/// Read access to environment variables.
///
/// Everything that inspects the deployment environment goes through this
/// trait so tests can supply fixed values instead of mutating the process
/// environment.
pub trait EnvSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: HashMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for StaticEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_env_returns_inserted_values() {
        let env = StaticEnv::new().with("A", "1");
        assert_eq!(env.get("A").as_deref(), Some("1"));
        assert!(env.get("B").is_none());
    }

    #[test]
    fn static_env_from_iter() {
        let env: StaticEnv = [("X", "x"), ("Y", "y")].into_iter().collect();
        assert_eq!(env.get("Y").as_deref(), Some("y"));
    }

    #[test]
    fn process_env_misses_unset_variable() {
        assert!(ProcessEnv.get("ERS_TEST_SURELY_UNSET_VARIABLE_7F3A").is_none());
    }
}
