use std::{cell::Cell, rc::Rc};

#[derive(PartialEq, Eq, Hash, Clone, Copy, derive_more::Display, Debug)]
pub enum Atom {
    #[display(fmt = "a")]
    A,
    #[display(fmt = "b")]
    B,
}

/// A binary tree over the atoms `a` and `b`.
///
/// Internal nodes carry their own firing state. A node normally has a single
/// holder; the only way to obtain a second handle to it is [`Term::share`].
/// Atoms are plain values, so any number of nodes may hold the same atom
/// without copying anything.
#[derive(Debug)]
pub enum Term {
    Atom(Atom),
    Node(Rc<Node>),
}

#[derive(Debug)]
pub struct Node {
    pub(crate) left: Term,
    pub(crate) right: Term,
    /// Set the first time the rule is applied at this position; never reset.
    pub(crate) fired: Cell<bool>,
}

impl Node {
    pub fn left(&self) -> &Term {
        &self.left
    }
    pub fn right(&self) -> &Term {
        &self.right
    }
    pub fn fired(&self) -> bool {
        self.fired.get()
    }
}

impl Term {
    pub fn a() -> Self {
        Term::Atom(Atom::A)
    }

    pub fn b() -> Self {
        Term::Atom(Atom::B)
    }

    /// An unfired internal node `(left*right)`.
    pub fn node(left: Term, right: Term) -> Self {
        Term::Node(Rc::new(Node {
            left,
            right,
            fired: Cell::new(false),
        }))
    }

    /// Structural copy with every firing flag reset.
    ///
    /// The copy shares no mutable state with `self`: firing positions on one
    /// never affects the other.
    pub fn copy(&self) -> Self {
        match self {
            Term::Atom(atom) => Term::Atom(*atom),
            Term::Node(node) => Term::node(node.left.copy(), node.right.copy()),
        }
    }

    /// A second handle to the same nodes. Firing a position through either
    /// handle marks it for both.
    pub(crate) fn share(&self) -> Self {
        match self {
            Term::Atom(atom) => Term::Atom(*atom),
            Term::Node(node) => Term::Node(Rc::clone(node)),
        }
    }

    /// Whether the rule has already been applied at the root position.
    /// Atoms are never fired.
    pub fn is_fired(&self) -> bool {
        match self {
            Term::Atom(_) => false,
            Term::Node(node) => node.fired(),
        }
    }

    /// Number of internal nodes.
    pub fn size(&self) -> usize {
        match self {
            Term::Atom(_) => 0,
            Term::Node(node) => 1 + node.left.size() + node.right.size(),
        }
    }

    /// Number of levels holding at least one internal node.
    pub fn depth(&self) -> usize {
        match self {
            Term::Atom(_) => 0,
            Term::Node(node) => 1 + std::cmp::max(node.left.depth(), node.right.depth()),
        }
    }

    /// The textual form used as the deduplication key of a state.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Atom(lhs), Term::Atom(rhs)) => lhs == rhs,
            (Term::Node(lhs), Term::Node(rhs)) => lhs.left == rhs.left && lhs.right == rhs.right,
            _ => false,
        }
    }
}
impl Eq for Term {}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Atom(atom) => f.write_fmt(format_args!("{atom}")),
            Term::Node(node) => f.write_fmt(format_args!("({}*{})", node.left, node.right)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ab() -> Term {
        Term::node(Term::a(), Term::b())
    }

    #[test]
    fn test_canonical() {
        assert_eq!(Term::a().canonical(), "a");
        assert_eq!(Term::b().canonical(), "b");
        assert_eq!(ab().canonical(), "(a*b)");
        assert_eq!(
            Term::node(Term::node(Term::b(), Term::a()), Term::b()).canonical(),
            "((b*a)*b)"
        );
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(ab(), ab());
        assert_ne!(ab(), Term::node(Term::b(), Term::a()));
        assert_ne!(Term::node(ab(), Term::a()), Term::node(Term::a(), ab()));
        assert_ne!(Term::a(), ab());

        let fired = ab();
        if let Term::Node(node) = &fired {
            node.fired.set(true);
        }
        assert_eq!(fired, ab());
        assert_eq!(fired.canonical(), ab().canonical());
    }

    #[test]
    fn test_copy_resets_firing_state() {
        let term = Term::node(ab(), Term::a());
        if let Term::Node(node) = &term {
            node.fired.set(true);
            if let Term::Node(left) = &node.left {
                left.fired.set(true);
            }
        }
        let copy = term.copy();
        assert_eq!(copy, term);
        assert!(!copy.is_fired());
        assert!(term.is_fired());
        if let Term::Node(node) = &copy {
            assert!(!node.left().is_fired());
        }
    }

    #[test]
    fn test_share_sees_firing() {
        let term = Term::node(ab(), Term::a());
        let shared = term.share();
        let copy = term.copy();
        if let Term::Node(node) = &term {
            node.fired.set(true);
        }
        assert!(shared.is_fired());
        assert!(!copy.is_fired());

        let copy = shared.copy();
        assert_eq!(copy, term);
        assert!(!copy.is_fired());
    }

    #[test]
    fn test_size_and_depth() {
        assert_eq!(Term::a().size(), 0);
        assert_eq!(Term::a().depth(), 0);
        let term = Term::node(ab(), ab());
        assert_eq!(term.size(), 3);
        assert_eq!(term.depth(), 2);
        let term = Term::node(Term::node(ab(), Term::a()), Term::b());
        assert_eq!(term.size(), 3);
        assert_eq!(term.depth(), 3);
    }
}
