//! The generation loop.
//!
//! Every round registers the current generation: each term is interned in the
//! [`Registry`] and one transition to its parent is counted in the [`Graph`].
//! The children of a registered generation are enumerated at the start of the
//! following round, tagged with the id of the term that produced them.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    graph::Graph,
    registry::{Registry, StateId},
    rewrite::{children, Sharing},
    term::Term,
};

/// Where a term in a generation came from.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Parent {
    /// The root has no parent.
    Root,
    State(StateId),
}

/// What to record when the root itself is registered.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub enum RootEdge {
    /// Nothing: the root contributes no transition.
    #[default]
    Omit,
    /// A `{root, root}` self-loop of weight 1.
    SelfLoop,
}

#[derive(PartialEq, Eq, Clone, Serialize, Debug)]
pub struct Stats {
    pub rounds: usize,
    /// Distinct states.
    pub states: usize,
    /// Distinct unordered pairs.
    pub edges: usize,
    /// Sum of all edge weights.
    pub transitions: u64,
    /// Term instances registered over all rounds.
    pub instances: usize,
    pub generation_sizes: Vec<usize>,
}

#[derive(Debug)]
struct Member {
    parent: Parent,
    term: Term,
}

#[derive(Debug)]
pub struct Builder {
    registry: Registry,
    graph: Graph,
    root_edge: RootEdge,
    sharing: Sharing,
    generation: Vec<Member>,
    /// Ids of `generation`, present once it has been registered.
    registered: Option<Vec<StateId>>,
    generation_sizes: Vec<usize>,
}

impl Builder {
    pub fn new(root: Term, root_edge: RootEdge, sharing: Sharing) -> Self {
        Self {
            registry: Registry::new(),
            graph: Graph::new(),
            root_edge,
            sharing,
            generation: vec![Member {
                parent: Parent::Root,
                term: root,
            }],
            registered: None,
            generation_sizes: vec![],
        }
    }

    /// Registers one more generation.
    pub fn round(&mut self) {
        if let Some(ids) = self.registered.take() {
            self.expand(ids);
        }
        let ids = self.register();
        self.registered = Some(ids);
        info!(
            round = self.generation_sizes.len(),
            terms = self.generation.len(),
            states = self.registry.len(),
            edges = self.graph.edge_count(),
            "registered generation"
        );
    }

    pub fn run(&mut self, rounds: usize) {
        for _ in 0..rounds {
            self.round();
        }
    }

    fn register(&mut self) -> Vec<StateId> {
        let mut ids = Vec::with_capacity(self.generation.len());
        for member in &self.generation {
            let (id, fresh) = self.registry.intern(&member.term);
            if fresh {
                debug!(%id, term = %member.term, "new state");
            }
            match (member.parent, self.root_edge) {
                (Parent::State(parent), _) => {
                    self.graph.record(id, parent);
                }
                (Parent::Root, RootEdge::SelfLoop) => {
                    self.graph.record(id, id);
                }
                (Parent::Root, RootEdge::Omit) => {}
            }
            ids.push(id);
        }
        self.generation_sizes.push(ids.len());
        ids
    }

    fn expand(&mut self, ids: Vec<StateId>) {
        let generation = std::mem::take(&mut self.generation);
        let mut next = vec![];
        for (member, id) in generation.into_iter().zip(ids) {
            next.extend(children(&member.term, self.sharing).map(|term| Member {
                parent: Parent::State(id),
                term,
            }));
        }
        self.generation = next;
    }

    /// Terms of the most recently registered generation, in registration
    /// order. Empty before the first round.
    pub fn generation(&self) -> impl Iterator<Item = &Term> + '_ {
        self.registered
            .is_some()
            .then(|| self.generation.iter().map(|member| &member.term))
            .into_iter()
            .flatten()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn stats(&self) -> Stats {
        Stats {
            rounds: self.generation_sizes.len(),
            states: self.registry.len(),
            edges: self.graph.edge_count(),
            transitions: self.graph.total_weight(),
            instances: self.generation_sizes.iter().sum(),
            generation_sizes: self.generation_sizes.clone(),
        }
    }

    pub fn finish(self) -> Multiway {
        let stats = self.stats();
        Multiway {
            registry: self.registry,
            graph: self.graph,
            stats,
        }
    }
}

/// A finished exploration. Read-only.
#[derive(Debug)]
pub struct Multiway {
    registry: Registry,
    graph: Graph,
    stats: Stats,
}

impl Multiway {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}
