//! Module compilation and caching.
//!
//! Modules are compiled once per engine and cached by the SHA-256
//! fingerprint of their bytes, so several bridges over the same module
//! share one compiled artifact. The cache is capped by module bytes and
//! evicts least recently used entries to make room.

use crate::config::BridgeConfig;
use crate::error::{Result, RuntimeError};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};
use wasmtime::{Engine, Module};

/// Compiled module result
#[derive(Clone)]
pub struct CompiledModule {
    /// Compiled module, cheap to clone
    pub module: Module,
    /// Hex SHA-256 of the module bytes
    pub fingerprint: String,
    /// Whether this was a cache hit
    pub cache_hit: bool,
}

/// Cache entry with metadata
struct CacheEntry {
    module: Module,
    size: usize,
    last_accessed: Instant,
}

/// Module compiler with caching
pub struct ModuleCompiler {
    engine: Engine,
    cache: HashMap<String, CacheEntry>,
    cache_hits: u64,
    cache_misses: u64,
    max_cache_size: usize,
    cache_size: usize,
}

impl ModuleCompiler {
    /// Create a compiler with an engine configured from `config`
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let mut engine_config = wasmtime::Config::new();
        engine_config.debug_info(config.debug_info);
        let engine = Engine::new(&engine_config).map_err(|e| RuntimeError::Instantiation(format!("{e:#}")))?;

        info!(
            debug_info = config.debug_info,
            max_cache_size = config.max_cache_size_bytes,
            "Initialized module compiler"
        );

        Ok(Self {
            engine,
            cache: HashMap::new(),
            cache_hits: 0,
            cache_misses: 0,
            max_cache_size: config.max_cache_size_bytes,
            cache_size: 0,
        })
    }

    /// Engine every compiled module belongs to
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile module bytes (binary or text format)
    pub fn compile(&mut self, bytes: &[u8]) -> Result<CompiledModule> {
        let fingerprint = fingerprint(bytes);

        if let Some(entry) = self.cache.get_mut(&fingerprint) {
            entry.last_accessed = Instant::now();
            self.cache_hits += 1;
            debug!(fingerprint = %fingerprint, "Cache hit");
            return Ok(CompiledModule {
                module: entry.module.clone(),
                fingerprint,
                cache_hit: true,
            });
        }

        self.cache_misses += 1;
        debug!(fingerprint = %fingerprint, size = bytes.len(), "Cache miss, compiling");

        let module = Module::new(&self.engine, bytes).map_err(|e| RuntimeError::Instantiation(format!("{e:#}")))?;

        while self.cache_size + bytes.len() > self.max_cache_size {
            if !self.evict_lru() {
                break;
            }
        }
        self.cache_size += bytes.len();
        self.cache.insert(
            fingerprint.clone(),
            CacheEntry {
                module: module.clone(),
                size: bytes.len(),
                last_accessed: Instant::now(),
            },
        );

        Ok(CompiledModule {
            module,
            fingerprint,
            cache_hit: false,
        })
    }

    /// Drop the least recently used module
    fn evict_lru(&mut self) -> bool {
        let lru_key = self
            .cache
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());

        match lru_key {
            Some(key) => {
                if let Some(entry) = self.cache.remove(&key) {
                    self.cache_size -= entry.size;
                }
                debug!(fingerprint = %key, "Evicted LRU module");
                true
            }
            None => false,
        }
    }

    /// Get cache statistics
    pub fn get_stats(&self) -> CompilerStats {
        CompilerStats {
            cache_entries: self.cache.len(),
            cache_size_bytes: self.cache_size as u64,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
        }
    }
}

/// Hex SHA-256 of module bytes
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compiler statistics
#[derive(Debug, Clone)]
pub struct CompilerStats {
    /// Number of cached modules
    pub cache_entries: usize,
    /// Source bytes of the cached modules
    pub cache_size_bytes: u64,
    /// Number of cache hits
    pub cache_hits: u64,
    /// Number of cache misses
    pub cache_misses: u64,
}

impl CompilerStats {
    /// Get cache hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_compiler() -> ModuleCompiler {
        ModuleCompiler::new(&BridgeConfig::default()).unwrap()
    }

    #[test]
    fn test_compile_and_cache_hit() {
        let mut compiler = create_compiler();
        let source = b"(module (func (export \"f\")))";

        let first = compiler.compile(source).unwrap();
        assert!(!first.cache_hit);
        let second = compiler.compile(source).unwrap();
        assert!(second.cache_hit);
        assert_eq!(first.fingerprint, second.fingerprint);

        let stats = compiler.get_stats();
        assert_eq!(stats.cache_entries, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_module() {
        let mut compiler = create_compiler();
        let err = compiler.compile(b"not a module").err().unwrap();
        assert!(matches!(err, RuntimeError::Instantiation(_)));
        assert_eq!(compiler.get_stats().cache_entries, 0);
    }

    #[test]
    fn test_fingerprint() {
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(fingerprint(b"a"), fingerprint(b"b"));
    }

    #[test]
    fn test_evict_lru() {
        let mut compiler = create_compiler();
        compiler.compile(b"(module)").unwrap();
        compiler.compile(b"(module (memory 1))").unwrap();

        assert!(compiler.evict_lru());
        assert_eq!(compiler.get_stats().cache_entries, 1);
        assert!(compiler.evict_lru());
        assert!(!compiler.evict_lru());
        assert_eq!(compiler.get_stats().cache_size_bytes, 0);
    }

    #[test]
    fn test_cache_cap_evicts_older_module() {
        let first = b"(module (memory 1))";
        let second = b"(module (memory 2))";
        let config = BridgeConfig::default().with_max_cache_size_bytes(first.len() + 4);
        let mut compiler = ModuleCompiler::new(&config).unwrap();

        compiler.compile(first).unwrap();
        compiler.compile(second).unwrap();

        let stats = compiler.get_stats();
        assert_eq!(stats.cache_entries, 1);
        assert_eq!(stats.cache_size_bytes, second.len() as u64);
        assert!(compiler.compile(second).unwrap().cache_hit);
        assert!(!compiler.compile(first).unwrap().cache_hit);
    }
}
