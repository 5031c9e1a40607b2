//! The subscriber registry: the collection of wake tokens a channel notifies
//! on every state transition.
//!
//! This plays the role the intrusive doubly-linked list plays in the
//! specification's external collaborators, but is reimplemented here as a
//! small `Vec` since Rust has no use for an intrusive list when ownership
//! already tracks entry lifetimes. Lookups are by pointer identity, exactly
//! as the source's `list_find(list, ptr)` does.

use std::sync::Arc;

use crate::semaphore::Semaphore;

/// An opaque handle identifying one registration in a [`SubscriberRegistry`].
///
/// Returned by [`SubscriberRegistry::insert`] and consumed by
/// [`SubscriberRegistry::remove`]; it is only ever valid for the registry it
/// was created from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RegistrationId(usize);

/// An unordered collection of wake tokens, looked up by pointer identity.
///
/// Must tolerate being enumerated ([`SubscriberRegistry::for_each`]) with the
/// owning channel's lock held: it performs no locking or blocking itself.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    entries: Vec<(RegistrationId, Arc<Semaphore>)>,
    next_id: usize,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        SubscriberRegistry {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers `token` and returns a handle identifying the registration.
    pub(crate) fn insert(&mut self, token: Arc<Semaphore>) -> RegistrationId {
        let id = RegistrationId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, token));
        id
    }

    /// Finds the registration for `token`, if any, by pointer identity.
    pub(crate) fn find(&self, token: &Arc<Semaphore>) -> Option<RegistrationId> {
        self.entries
            .iter()
            .find(|(_, t)| Arc::ptr_eq(t, token))
            .map(|(id, _)| *id)
    }

    /// Removes the registration identified by `id`, if still present.
    pub(crate) fn remove(&mut self, id: RegistrationId) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Invokes `f` with every currently registered token.
    pub(crate) fn for_each(&self, mut f: impl FnMut(&Arc<Semaphore>)) {
        for (_, token) in &self.entries {
            f(token);
        }
    }

    /// Whether any subscriber is currently registered.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_find_remove_roundtrip() {
        let mut reg = SubscriberRegistry::new();
        let token_a = Arc::new(Semaphore::new(0));
        let token_b = Arc::new(Semaphore::new(0));

        let id_a = reg.insert(token_a.clone());
        let id_b = reg.insert(token_b.clone());
        assert_ne!(id_a, id_b);

        assert_eq!(reg.find(&token_a), Some(id_a));
        assert_eq!(reg.find(&token_b), Some(id_b));

        reg.remove(id_a);
        assert_eq!(reg.find(&token_a), None);
        assert_eq!(reg.find(&token_b), Some(id_b));
        assert!(!reg.is_empty());

        reg.remove(id_b);
        assert!(reg.is_empty());
    }

    #[test]
    fn find_distinguishes_by_identity_not_value() {
        let mut reg = SubscriberRegistry::new();
        let token_a = Arc::new(Semaphore::new(0));
        let token_a_clone_of_contents = Arc::new(Semaphore::new(0));

        reg.insert(token_a.clone());
        // Same logical state, different allocation: must not be found.
        assert_eq!(reg.find(&token_a_clone_of_contents), None);
    }

    #[test]
    fn for_each_visits_every_entry() {
        let mut reg = SubscriberRegistry::new();
        for _ in 0..5 {
            reg.insert(Arc::new(Semaphore::new(0)));
        }
        let mut count = 0;
        reg.for_each(|_| count += 1);
        assert_eq!(count, 5);
    }
}
