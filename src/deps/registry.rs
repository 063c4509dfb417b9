//! Unique-by-name store of declared dependencies.

use std::collections::HashMap;

use super::dependency::Dependency;
use super::identifier::Identifier;

/// Declared dependencies in declaration order.
#[derive(Debug, Default)]
pub struct Registry {
    dependencies: Vec<Dependency>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `id.name`, creating the entry if it is new.
    ///
    /// Returns the entry's position and whether it was created. When the
    /// name already exists the new package name and range are ignored: the
    /// first declaration wins.
    pub fn get_or_create(&mut self, id: &Identifier) -> (usize, bool) {
        if let Some(&index) = self.index.get(&id.name) {
            return (index, false);
        }
        let index = self.dependencies.len();
        self.dependencies.push(Dependency::new(id));
        self.index.insert(id.name.clone(), index);
        (index, true)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.position(name).map(|i| &self.dependencies[i])
    }

    pub(crate) fn at(&self, index: usize) -> &Dependency {
        &self.dependencies[index]
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> &mut Dependency {
        &mut self.dependencies[index]
    }

    /// All dependencies in declaration order.
    pub fn all(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// True iff every registered dependency is imported (vacuously true when empty).
    pub fn all_imported(&self) -> bool {
        self.dependencies.iter().all(Dependency::is_imported)
    }

    /// Positions of dependencies still waiting to be imported.
    pub fn pending(&self) -> Vec<usize> {
        self.dependencies
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_imported())
            .map(|(i, _)| i)
            .collect()
    }

    /// Some dependency is present on disk but not usable in this process.
    pub fn any_installed_but_not_imported(&self) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.is_installed() && !d.is_imported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::{ModuleHandle, VersionRange};

    #[test]
    fn redeclaring_returns_same_entry() {
        let mut registry = Registry::new();
        let (first, created) = registry.get_or_create(&("PIL", "Pillow").into());
        assert!(created);
        let (second, created) = registry.get_or_create(&Identifier::new("PIL"));
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn first_declaration_wins() {
        let mut registry = Registry::new();
        registry.get_or_create(&("PIL", "Pillow").into());
        registry.get_or_create(&("PIL", "pillow-simd", VersionRange::at_least("9.0")).into());

        let dep = registry.get("PIL").unwrap();
        assert_eq!(dep.pip_name(), "Pillow");
        assert!(dep.version_range().is_unbounded());
    }

    #[test]
    fn declaration_order_is_kept() {
        let mut registry = Registry::new();
        for name in ["zeta", "alpha", "mu"] {
            registry.get_or_create(&Identifier::new(name));
        }
        let names: Vec<&str> = registry.all().iter().map(Dependency::name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn aggregate_queries() {
        let mut registry = Registry::new();
        assert!(registry.all_imported());

        let (a, _) = registry.get_or_create(&Identifier::new("a"));
        let (_, _) = registry.get_or_create(&Identifier::new("b"));
        registry
            .at_mut(a)
            .record_import(Ok(ModuleHandle::new("a").with_version("1.0")));

        assert!(!registry.all_imported());
        assert_eq!(registry.pending(), vec![1]);
        assert!(!registry.any_installed_but_not_imported());

        registry.at_mut(1).mark_installed();
        assert!(registry.any_installed_but_not_imported());
    }
}
