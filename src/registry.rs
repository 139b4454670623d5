//! Process-wide registry of the buffer builtin.
//!
//! The host resolves script-visible methods by name. The table is built
//! exactly once, on first access, behind a single check; there is no
//! re-registration and no teardown.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::bridge::{self, BindingError, Value};
use crate::buffer::BufferId;

/// A native function reachable from script as a named method.
pub type NativeFn = Arc<dyn Fn(BufferId, &[Value]) -> Result<Value, BindingError> + Send + Sync>;

/// A registered method.
pub struct MethodEntry {
    pub name: &'static str,
    /// Script-visible argument count; the binding checks it before any core
    /// algorithm runs.
    pub arity: usize,
    func: NativeFn,
}

/// Name-indexed table of the buffer constructor and its prototype methods.
pub struct BuiltinRegistry {
    methods: HashMap<&'static str, MethodEntry>,
}

impl BuiltinRegistry {
    fn new() -> Self {
        let mut registry = Self {
            methods: HashMap::new(),
        };
        registry.register("Buffer", 1, Arc::new(bridge::buffer_new));
        registry.register("compare", 1, Arc::new(bridge::buffer_compare));
        registry.register("copy", 4, Arc::new(bridge::buffer_copy));
        registry.register("write", 3, Arc::new(bridge::buffer_write));
        registry.register("slice", 2, Arc::new(bridge::buffer_slice));
        registry.register("toString", 2, Arc::new(bridge::buffer_to_string));
        registry
    }

    fn register(&mut self, name: &'static str, arity: usize, func: NativeFn) {
        self.methods.insert(name, MethodEntry { name, arity, func });
    }

    pub fn get(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.get(name)
    }

    /// Dispatch a script-visible call on the buffer bound to `this`.
    pub fn call(&self, this: BufferId, name: &str, args: &[Value]) -> Result<Value, BindingError> {
        let entry = self
            .methods
            .get(name)
            .ok_or_else(|| BindingError::UnknownMethod(name.to_string()))?;
        (entry.func)(this, args)
    }

    pub fn method_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.methods.values().map(|entry| entry.name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

static REGISTRY: Lazy<BuiltinRegistry> = Lazy::new(BuiltinRegistry::new);

/// The buffer builtin module, initialized once per process.
pub fn builtin_registry() -> &'static BuiltinRegistry {
    &REGISTRY
}
