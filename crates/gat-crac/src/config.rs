//! Import settings.

use serde::{Deserialize, Serialize};

/// Settings of one import pass. Every field has a default so partial TOML
/// sections deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Worker threads resolving one stage (0 = one per CPU, 1 = sequential).
    #[serde(default)]
    pub threads: usize,
    /// Monitor an element after every imported contingency when it names none.
    #[serde(default = "default_expand_cnecs")]
    pub expand_cnecs_to_all_contingencies: bool,
}

fn default_expand_cnecs() -> bool {
    true
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            expand_cnecs_to_all_contingencies: default_expand_cnecs(),
        }
    }
}

impl ImportConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}
