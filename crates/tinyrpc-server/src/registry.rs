//! Fixed-capacity method table.
//!
//! `N` tagged slots, each either free or holding one method. Insertion takes
//! the lowest free index and removal frees a slot in place, so slot order
//! (not registration order) is what `__rpc.listMethods` reports. Duplicate
//! names are accepted; lookups resolve to the lowest matching slot.

use std::fmt;

use crate::error::RegistrationError;
use crate::handler::MethodHandler;

/// A registered method
pub struct MethodEntry {
    name: String,
    handler: Box<dyn MethodHandler>,
    description: Option<String>,
    expose_schema: bool,
}

impl MethodEntry {
    pub fn new(name: impl Into<String>, handler: Box<dyn MethodHandler>) -> Self {
        Self {
            name: name.into(),
            handler,
            description: None,
            expose_schema: false,
        }
    }

    pub fn with_schema(mut self, description: Option<String>, expose_schema: bool) -> Self {
        self.description = description;
        self.expose_schema = expose_schema;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &dyn MethodHandler {
        self.handler.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn expose_schema(&self) -> bool {
        self.expose_schema
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("expose_schema", &self.expose_schema)
            .finish_non_exhaustive()
    }
}

/// Slot table holding at most `N` methods
#[derive(Debug)]
pub struct MethodRegistry<const N: usize> {
    slots: [Option<MethodEntry>; N],
    count: usize,
}

impl<const N: usize> MethodRegistry<N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            count: 0,
        }
    }

    /// Place `entry` in the lowest free slot and return that slot's index
    pub fn insert(&mut self, entry: MethodEntry) -> Result<usize, RegistrationError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(RegistrationError::Full { capacity: N })?;
        self.slots[slot] = Some(entry);
        self.count += 1;
        Ok(slot)
    }

    /// Free the lowest slot holding `name`; returns the freed index
    pub fn remove(&mut self, name: &str) -> Option<usize> {
        let slot = self.position(name)?;
        self.slots[slot] = None;
        self.count -= 1;
        Some(slot)
    }

    /// First active entry named `name`, by ascending slot index
    pub fn find(&self, name: &str) -> Option<&MethodEntry> {
        self.position(name).and_then(|slot| self.slots[slot].as_ref())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|entry| entry.name == name))
    }

    /// Active entries in slot order
    pub fn entries(&self) -> impl Iterator<Item = &MethodEntry> {
        self.slots.iter().flatten()
    }

    /// Active method names in slot order
    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.entries().map(MethodEntry::name)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= N
    }

    pub fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for MethodRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerResult;
    use serde_json::json;
    use tinyrpc_protocol::RequestParams;

    fn entry(name: &str, tag: i64) -> MethodEntry {
        MethodEntry::new(
            name,
            Box::new(move |_: Option<&RequestParams>| -> HandlerResult { Ok(json!(tag)) }),
        )
    }

    fn names<const N: usize>(registry: &MethodRegistry<N>) -> Vec<&str> {
        registry.active_names().collect()
    }

    #[test]
    fn test_insert_until_full() {
        let mut registry: MethodRegistry<2> = MethodRegistry::new();
        assert_eq!(registry.insert(entry("a", 1)), Ok(0));
        assert_eq!(registry.insert(entry("b", 2)), Ok(1));
        assert!(registry.is_full());

        assert_eq!(
            registry.insert(entry("c", 3)),
            Err(RegistrationError::Full { capacity: 2 })
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(names(&registry), vec!["a", "b"]);
    }

    #[test]
    fn test_removed_slot_is_reused_first() {
        let mut registry: MethodRegistry<4> = MethodRegistry::new();
        registry.insert(entry("a", 1)).unwrap();
        registry.insert(entry("b", 2)).unwrap();
        registry.insert(entry("c", 3)).unwrap();

        assert_eq!(registry.remove("a"), Some(0));
        assert_eq!(registry.len(), 2);
        assert_eq!(names(&registry), vec!["b", "c"]);

        assert_eq!(registry.insert(entry("d", 4)), Ok(0));
        assert_eq!(names(&registry), vec!["d", "b", "c"]);
    }

    #[test]
    fn test_duplicate_names_resolve_to_lowest_slot() {
        let mut registry: MethodRegistry<4> = MethodRegistry::new();
        registry.insert(entry("dup", 1)).unwrap();
        registry.insert(entry("dup", 2)).unwrap();

        let found = registry.find("dup").unwrap();
        assert_eq!(found.handler().handle(None).unwrap(), json!(1));

        registry.remove("dup");
        let found = registry.find("dup").unwrap();
        assert_eq!(found.handler().handle(None).unwrap(), json!(2));
    }

    #[test]
    fn test_remove_missing() {
        let mut registry: MethodRegistry<1> = MethodRegistry::new();
        assert_eq!(registry.remove("nope"), None);
        assert!(registry.is_empty());
        assert_eq!(registry.capacity(), 1);
    }
}
