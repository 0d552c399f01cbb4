//! Evaluation environment: variables, random source and buffers.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::ast::Name;
use crate::vm::{GlobalBuffer, SparseBuffer};

/// Mutable state a script runs against.
///
/// Variable names are case-insensitive. Names coming from compiled
/// programs are already lowercase, so the hot path never allocates.
#[derive(Debug)]
pub struct Environment {
    vars: HashMap<Name, f64>,
    rng: ChaCha8Rng,
    local: SparseBuffer,
    global: GlobalBuffer,
}

impl Environment {
    pub fn new(global: GlobalBuffer, seed: u64) -> Self {
        Self {
            vars: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            local: SparseBuffer::new(),
            global,
        }
    }

    /// Read a variable, or `default` if it was never set.
    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.vars
            .get(&*fold(name))
            .copied()
            .unwrap_or(default)
    }

    pub fn set(&mut self, name: &str, value: f64) {
        match fold(name) {
            Cow::Borrowed(key) => {
                if let Some(slot) = self.vars.get_mut(key) {
                    *slot = value;
                } else {
                    self.vars.insert(Arc::from(key), value);
                }
            }
            Cow::Owned(key) => {
                self.vars.insert(Arc::from(key), value);
            }
        }
    }

    /// Store under a name that is known to be lowercase already.
    pub(crate) fn set_name(&mut self, name: &Name, value: f64) {
        if let Some(slot) = self.vars.get_mut(&**name) {
            *slot = value;
        } else {
            self.vars.insert(name.clone(), value);
        }
    }

    pub(crate) fn get_name(&self, name: &str) -> f64 {
        self.vars.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(&*fold(name))
    }

    /// Forget every variable. Buffers are left untouched.
    pub fn clear_vars(&mut self) {
        self.vars.clear();
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn local(&self) -> &SparseBuffer {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut SparseBuffer {
        &mut self.local
    }

    pub fn global(&self) -> &GlobalBuffer {
        &self.global
    }
}

fn fold(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::new(GlobalBuffer::new(), 0)
    }

    #[test]
    fn lookups_ignore_case() {
        let mut env = env();
        env.set("Speed", 2.0);
        assert_eq!(env.get("speed", 0.0), 2.0);
        assert_eq!(env.get("SPEED", 0.0), 2.0);
        env.set("SPEED", 3.0);
        assert_eq!(env.var_count(), 1);
        assert_eq!(env.get("speed", 0.0), 3.0);
    }

    #[test]
    fn missing_variable_returns_default() {
        let env = env();
        assert_eq!(env.get("nope", 0.0), 0.0);
        assert_eq!(env.get("nope", 1.5), 1.5);
        assert!(!env.contains("nope"));
    }

    #[test]
    fn clear_vars_keeps_buffers() {
        let mut env = env();
        env.set("a", 1.0);
        env.local_mut().set(2, 4.0);
        env.global().set(2, 8.0);
        env.clear_vars();
        assert_eq!(env.var_count(), 0);
        assert_eq!(env.local().get(2), 4.0);
        assert_eq!(env.global().get(2), 8.0);
    }

    #[test]
    fn same_seed_same_sequence() {
        use rand::Rng;
        let mut a = Environment::new(GlobalBuffer::new(), 42);
        let mut b = Environment::new(GlobalBuffer::new(), 42);
        let xs: Vec<f64> = (0..4).map(|_| a.rng().gen()).collect();
        let ys: Vec<f64> = (0..4).map(|_| b.rng().gen()).collect();
        assert_eq!(xs, ys);
    }
}
