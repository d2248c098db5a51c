//! Named adapter registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use sql_adapter_core::{dialect_for, Adapter, AdapterConfig, AdapterError, Driver, TableSchema};
use sql_mem_driver::MemoryDriver;

use crate::error::RuntimeError;
use crate::options::ConnectionOptions;

/// Registry of adapters set up under a name.
#[derive(Debug, Default)]
pub struct AdapterRegistry {
    adapters: RwLock<HashMap<String, Arc<Adapter>>>,
}

impl AdapterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets up an adapter from a connection URL and registers it.
    ///
    /// # Arguments
    /// * `name` - Registry name for the adapter
    /// * `url` - Connection URL, e.g. `memory://articles?dialect=postgres`
    /// * `schemas` - Tables registered with the backing store
    ///
    /// # Returns
    /// The registered adapter, or an error when the name is taken, the
    /// scheme or dialect is unknown, or a schema cannot be registered.
    pub fn setup(
        &self,
        name: &str,
        url: &str,
        schemas: &[TableSchema],
    ) -> Result<Arc<Adapter>, RuntimeError> {
        let options = ConnectionOptions::parse(url)?;

        let dialect_name = options.dialect();
        let dialect = dialect_for(dialect_name)
            .ok_or_else(|| RuntimeError::UnknownDialect(dialect_name.to_string()))?;

        let mut config = AdapterConfig::default();
        if let Some(capacity) = options.param("capacity") {
            config.initial_table_capacity =
                capacity.parse().map_err(|_| RuntimeError::InvalidUrl {
                    url: url.to_string(),
                    reason: format!("capacity '{}' is not a number", capacity),
                })?;
        }
        if options.param("strict_binds") == Some("false") {
            config.strict_binds = false;
        }

        let driver: Box<dyn Driver> = match options.scheme.as_str() {
            "memory" => {
                let driver = MemoryDriver::with_capacity(config.initial_table_capacity);
                for schema in schemas {
                    driver.register(schema)?;
                }
                Box::new(driver)
            }
            other => return Err(RuntimeError::UnknownScheme(other.to_string())),
        };

        let adapter = Arc::new(Adapter::with_config(name, dialect, driver, config));

        let mut adapters = self
            .adapters
            .write()
            .map_err(|_| RuntimeError::Adapter(AdapterError::LockPoisoned))?;
        if adapters.contains_key(name) {
            return Err(RuntimeError::AdapterExists(name.to_string()));
        }
        adapters.insert(name.to_string(), Arc::clone(&adapter));
        tracing::debug!("set up adapter '{}' ({} dialect)", name, dialect_name);
        Ok(adapter)
    }

    /// Fetches a registered adapter.
    pub fn adapter(&self, name: &str) -> Result<Arc<Adapter>, RuntimeError> {
        let adapters = self
            .adapters
            .read()
            .map_err(|_| RuntimeError::Adapter(AdapterError::LockPoisoned))?;
        adapters
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::AdapterNotFound(name.to_string()))
    }

    /// Drops a registered adapter.
    pub fn teardown(&self, name: &str) -> Result<(), RuntimeError> {
        let mut adapters = self
            .adapters
            .write()
            .map_err(|_| RuntimeError::Adapter(AdapterError::LockPoisoned))?;
        adapters
            .remove(name)
            .ok_or_else(|| RuntimeError::AdapterNotFound(name.to_string()))?;
        tracing::debug!("tore down adapter '{}'", name);
        Ok(())
    }

    /// Names of the registered adapters.
    pub fn names(&self) -> Vec<String> {
        match self.adapters.read() {
            Ok(adapters) => adapters.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_adapter_core::{Column, Value};

    fn articles() -> TableSchema {
        TableSchema::new("articles", vec![Column::serial("id")])
    }

    #[test]
    fn test_setup_and_fetch() {
        let registry = AdapterRegistry::new();
        let adapter = registry
            .setup("default", "memory://articles?dialect=postgres", &[articles()])
            .unwrap();

        assert_eq!(adapter.dialect().name(), "postgres");
        let fetched = registry.adapter("default").unwrap();
        let key = fetched.create(&articles(), &[]).unwrap();
        assert_eq!(key, Some(Value::Integer(1)));
    }

    #[test]
    fn test_duplicate_setup_is_an_error() {
        let registry = AdapterRegistry::new();
        registry
            .setup("default", "memory://articles", &[articles()])
            .unwrap();
        assert!(matches!(
            registry.setup("default", "memory://articles", &[]),
            Err(RuntimeError::AdapterExists(_))
        ));
    }

    #[test]
    fn test_teardown() {
        let registry = AdapterRegistry::new();
        registry
            .setup("default", "memory://articles", &[articles()])
            .unwrap();
        registry.teardown("default").unwrap();
        assert!(matches!(
            registry.adapter("default"),
            Err(RuntimeError::AdapterNotFound(_))
        ));
        assert!(registry.teardown("default").is_err());
    }

    #[test]
    fn test_unknown_scheme_and_dialect() {
        let registry = AdapterRegistry::new();
        assert!(matches!(
            registry.setup("a", "postgres://db", &[]),
            Err(RuntimeError::UnknownScheme(_))
        ));
        assert!(matches!(
            registry.setup("b", "memory://articles?dialect=db2", &[]),
            Err(RuntimeError::UnknownDialect(_))
        ));
    }
}
