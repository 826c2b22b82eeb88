//! FILENAME: engine/src/registry.rs
//! PURPOSE: Case-insensitive function name registry.
//! CONTEXT: No analog exists in the teacher codebase (its `script-engine`
//! crate, which would host user-registered functions, has no source at
//! all). Grounded loosely in the repo-wide convention of canonicalizing
//! identifiers to upper case for comparison while keeping the original
//! text around for display.

use std::collections::HashMap;

use crate::cell::CellValue;
use crate::evaluator::EvalContext;
use crate::functions;

/// A registered function's implementation: evaluated arguments in, a value
/// out. Boxed so both plain built-in `fn` items and host closures can be
/// registered uniformly.
pub type Function = Box<dyn Fn(&[CellValue], &EvalContext) -> CellValue>;

pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
    original_names: HashMap<String, String>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
            original_names: HashMap::new(),
        }
    }

    /// A registry seeded with the built-in function library (§4.8).
    pub fn with_builtins() -> Self {
        let mut registry = FunctionRegistry::new();
        functions::register_builtins(&mut registry);
        registry
    }

    /// Registers `f` under `name`. A second registration under the same
    /// upper-case key (case-insensitively) replaces the prior
    /// implementation and the prior original-case name.
    pub fn register<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&[CellValue], &EvalContext) -> CellValue + 'static,
    {
        let upper = name.to_uppercase();
        self.functions.insert(upper.clone(), Box::new(f));
        self.original_names.insert(upper, name.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(&name.to_uppercase())
    }

    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_uppercase())
    }

    /// Original-case names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.original_names.values().cloned().collect()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        FunctionRegistry::new()
    }
}
