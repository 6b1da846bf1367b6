//! # Import Collection
//!
//! Collects the host modules needed by the generated procedure. Each module
//! is imported once, in the order it was first requested.

use itertools::Itertools;

#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    requested: Vec<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, module: impl Into<String>) {
        let module = module.into();
        if !module.is_empty() {
            self.requested.push(module);
        }
    }

    pub fn extend<I, S>(&mut self, modules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            self.add(module);
        }
    }

    /// Deduplicated module names.
    pub fn modules(&self) -> Vec<String> {
        self.requested.iter().unique().cloned().collect()
    }
}

/// `import x` lines for a module list.
pub fn import_lines(modules: &[String]) -> Vec<String> {
    modules.iter().map(|module| format!("import {module}")).collect()
}
