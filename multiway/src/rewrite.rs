use tracing::trace;

use crate::term::Term;

/// How the two occurrences of the right operand in `((R*L)*R)` relate.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub enum Sharing {
    /// One copy of `R` fills both places, so firing a position inside either
    /// occurrence fires it in both.
    #[default]
    Shared,
    /// Each occurrence is a copy of its own.
    Copied,
}

/// Outcome of one [`step`].
#[derive(Debug)]
pub struct Step {
    /// `true` once no position reachable from the stepped term can fire.
    pub exhausted: bool,
    pub result: Term,
}

/// `(L*R) -> ((R*L)*R)`, built from fresh copies of the operands.
fn fire(left: &Term, right: &Term, sharing: Sharing) -> Term {
    let right = right.copy();
    let second = match sharing {
        Sharing::Shared => right.share(),
        Sharing::Copied => right.copy(),
    };
    Term::node(Term::node(right, left.copy()), second)
}

/// Applies the rule once, at the shallowest positions of `term` that have not
/// fired yet.
///
/// An unfired node fires at its own position. A fired node steps both of its
/// children and rebuilds itself from their results, so every call fires one
/// more level of the tree. The returned term is always freshly built and
/// unfired; only `term`'s flags are mutated.
pub fn step(term: &Term, sharing: Sharing) -> Step {
    match term {
        Term::Atom(atom) => Step {
            exhausted: true,
            result: Term::Atom(*atom),
        },
        Term::Node(node) if !node.fired() => {
            node.fired.set(true);
            let result = fire(&node.left, &node.right, sharing);
            trace!(%result, "fired");
            Step {
                exhausted: false,
                result,
            }
        }
        Term::Node(node) => {
            let left = step(&node.left, sharing);
            let right = step(&node.right, sharing);
            Step {
                exhausted: left.exhausted && right.exhausted,
                result: Term::node(left.result, right.result),
            }
        }
    }
}

/// Every one-step rewrite of `term`, in firing order.
///
/// The iterator drives [`step`] on `term` itself, so it consumes the term's
/// firing history: once it has returned `None`, enumerating the same term
/// again yields nothing. Enumerate a [`Term::copy`] to start over.
pub fn children(term: &Term, sharing: Sharing) -> Children<'_> {
    Children {
        term,
        sharing,
        exhausted: false,
    }
}

#[derive(Debug)]
pub struct Children<'a> {
    term: &'a Term,
    sharing: Sharing,
    exhausted: bool,
}

impl Iterator for Children<'_> {
    type Item = Term;

    fn next(&mut self) -> Option<Term> {
        if self.exhausted {
            return None;
        }
        let Step { exhausted, result } = step(self.term, self.sharing);
        self.exhausted = exhausted;
        (!exhausted).then(|| result)
    }
}

impl std::iter::FusedIterator for Children<'_> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse_term;

    fn term(s: &str) -> Term {
        parse_term(s).unwrap()
    }

    fn canonicals(term: &Term, sharing: Sharing) -> Vec<String> {
        children(term, sharing).map(|t| t.canonical()).collect()
    }

    fn run(s: &str) -> Vec<String> {
        canonicals(&term(s), Sharing::Shared)
    }

    #[test]
    fn test_step_atom() {
        let atom = Term::a();
        let Step { exhausted, result } = step(&atom, Sharing::Shared);
        assert!(exhausted);
        assert_eq!(result, Term::a());
        assert!(!atom.is_fired());
    }

    #[test]
    fn test_step_protocol() {
        let t = term("(a*b)");
        let first = step(&t, Sharing::Shared);
        assert!(!first.exhausted);
        assert_eq!(first.result.canonical(), "((b*a)*b)");
        assert!(t.is_fired());
        assert!(!first.result.is_fired());

        let second = step(&t, Sharing::Shared);
        assert!(second.exhausted);
        assert_eq!(second.result.canonical(), "(a*b)");
    }

    #[test]
    fn test_children() {
        assert_eq!(run("a"), Vec::<String>::new());
        assert_eq!(run("(a*b)"), vec!["((b*a)*b)"]);
        assert_eq!(run("((b*a)*b)"), vec!["((b*(b*a))*b)", "(((a*b)*a)*b)"]);
        assert_eq!(
            run("(((a*b)*a)*b)"),
            vec![
                "((b*((a*b)*a))*b)",
                "(((a*(a*b))*a)*b)",
                "((((b*a)*b)*a)*b)"
            ]
        );
        assert_eq!(
            run("(a*(a*b))"),
            vec!["(((a*b)*a)*(a*b))", "(a*((b*a)*b))"]
        );
    }

    #[test]
    fn test_parsed_terms_ignore_sharing() {
        // Nothing is shared in a parsed term, so both modes agree on it.
        for s in ["((b*a)*b)", "(((a*b)*a)*b)", "((a*b)*(a*b))"] {
            assert_eq!(
                canonicals(&term(s), Sharing::Shared),
                canonicals(&term(s), Sharing::Copied),
                "{s}"
            );
        }
    }

    #[test]
    fn test_siblings_fire_together() {
        assert_eq!(
            run("((a*b)*(a*b))"),
            vec!["(((a*b)*(a*b))*(a*b))", "(((b*a)*b)*((b*a)*b))"]
        );
    }

    #[test]
    fn test_children_count_is_depth() {
        for s in [
            "(a*b)",
            "((b*a)*b)",
            "((a*b)*(a*b))",
            "(((a*(a*b))*a)*b)",
            "((((b*a)*b)*(b*a))*b)",
        ] {
            let t = term(s);
            let count = children(&t, Sharing::Shared).count();
            assert_eq!(count, t.depth(), "{s}");
        }
    }

    #[test]
    fn test_children_not_restartable() {
        let t = term("((b*a)*b)");
        let fresh = t.copy();
        assert_eq!(children(&t, Sharing::Shared).count(), 2);
        assert_eq!(children(&t, Sharing::Shared).count(), 0);

        let mut iter = children(&t, Sharing::Shared);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());

        assert_eq!(children(&fresh, Sharing::Shared).count(), 2);
    }

    #[test]
    fn test_children_reproducible_on_copy() {
        let source = term("((((b*a)*b)*(b*a))*b)");
        let first = canonicals(&source.copy(), Sharing::Shared);
        let second = canonicals(&source.copy(), Sharing::Shared);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    fn first_child(s: &str, sharing: Sharing) -> Term {
        children(&term(s), sharing).next().unwrap()
    }

    #[test]
    fn test_shared_operand_fires_once() {
        // ((R*L)*R) with R = (a*b): firing the right occurrence of R also
        // marks the left one, so the third level has nothing left to fire.
        let child = first_child("(a*(a*b))", Sharing::Shared);
        assert_eq!(child.canonical(), "(((a*b)*a)*(a*b))");
        step(&child, Sharing::Shared);
        step(&child, Sharing::Shared);
        if let Term::Node(node) = &child {
            if let Term::Node(inner) = node.left() {
                assert!(inner.left().is_fired());
            }
        }

        let child = first_child("(a*(a*b))", Sharing::Shared);
        assert_eq!(
            canonicals(&child, Sharing::Shared),
            vec!["(((a*b)*((a*b)*a))*(a*b))", "(((a*(a*b))*a)*((b*a)*b))"]
        );
    }

    #[test]
    fn test_copied_operands_are_independent() {
        let child = first_child("(a*(a*b))", Sharing::Copied);
        assert_eq!(child.canonical(), "(((a*b)*a)*(a*b))");
        step(&child, Sharing::Copied);
        step(&child, Sharing::Copied);
        if let Term::Node(node) = &child {
            assert!(node.right().is_fired());
            if let Term::Node(inner) = node.left() {
                assert!(inner.fired());
                assert!(!inner.left().is_fired());
            }
        }

        let child = first_child("(a*(a*b))", Sharing::Copied);
        assert_eq!(
            canonicals(&child, Sharing::Copied),
            vec![
                "(((a*b)*((a*b)*a))*(a*b))",
                "(((a*(a*b))*a)*((b*a)*b))",
                "((((b*a)*b)*a)*(a*b))"
            ]
        );
    }
}
