use std::collections::{hash_map::Entry, HashMap};

use serde::Serialize;

use crate::term::Term;

/// Identifier of a distinct state. Assigned in first-seen order from 0.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, derive_more::Display, Serialize, Debug,
)]
#[display(fmt = "{_0}")]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct State {
    canonical: String,
    representative: Term,
}

/// Append-only mapping from canonical form to [`StateId`], keeping the first
/// term seen for every id.
#[derive(Default, Debug)]
pub struct Registry {
    ids: HashMap<String, StateId>,
    states: Vec<State>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the id of `term`'s canonical form, assigning the next one if
    /// the form has not been seen. The flag is `true` for a fresh id.
    pub fn intern(&mut self, term: &Term) -> (StateId, bool) {
        match self.ids.entry(term.canonical()) {
            Entry::Occupied(entry) => (*entry.get(), false),
            Entry::Vacant(entry) => {
                let id = StateId::new(self.states.len());
                self.states.push(State {
                    canonical: entry.key().clone(),
                    representative: term.copy(),
                });
                entry.insert(id);
                (id, true)
            }
        }
    }

    pub fn get(&self, canonical: &str) -> Option<StateId> {
        self.ids.get(canonical).copied()
    }

    pub fn canonical(&self, id: StateId) -> Option<&str> {
        self.states.get(id.0).map(|state| state.canonical.as_str())
    }

    pub fn representative(&self, id: StateId) -> Option<&Term> {
        self.states.get(id.0).map(|state| &state.representative)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States in id order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &str)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (StateId::new(i), state.canonical.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        parser::parse_term,
        rewrite::{children, Sharing},
    };

    #[test]
    fn test_intern() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        let (ab, fresh) = registry.intern(&parse_term("(a*b)").unwrap());
        assert_eq!((ab.index(), fresh), (0, true));
        let (bab, fresh) = registry.intern(&parse_term("((b*a)*b)").unwrap());
        assert_eq!((bab.index(), fresh), (1, true));
        let (again, fresh) = registry.intern(&parse_term("( a * b )").unwrap());
        assert_eq!((again, fresh), (ab, false));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("((b*a)*b)"), Some(bab));
        assert_eq!(registry.get("(b*a)"), None);
        assert_eq!(registry.canonical(ab), Some("(a*b)"));
        assert_eq!(
            registry.iter().collect::<Vec<_>>(),
            vec![(ab, "(a*b)"), (bab, "((b*a)*b)")]
        );
    }

    #[test]
    fn test_ids_are_unique_per_form() {
        let mut registry = Registry::new();
        let mut seen = HashMap::new();
        let term = parse_term("((((b*a)*b)*(b*a))*b)").unwrap();
        let mut terms = vec![term.copy()];
        terms.extend(children(&term, Sharing::Shared));
        let copies = terms.iter().map(Term::copy).collect::<Vec<_>>();
        terms.extend(copies);
        for term in &terms {
            let (id, _) = registry.intern(term);
            assert_eq!(*seen.entry(term.canonical()).or_insert(id), id);
        }
        assert_eq!(registry.len(), seen.len());
        for (id, canonical) in registry.iter() {
            assert_eq!(registry.get(canonical), Some(id));
        }
    }

    #[test]
    fn test_representative_is_unfired_copy() {
        let mut registry = Registry::new();
        let term = parse_term("((b*a)*b)").unwrap();
        let (id, _) = registry.intern(&term);
        assert_eq!(children(&term, Sharing::Shared).count(), 2);

        let representative = registry.representative(id).unwrap();
        assert_eq!(representative, &term);
        assert!(!representative.is_fired());
        assert_eq!(children(&representative.copy(), Sharing::Shared).count(), 2);
    }
}
