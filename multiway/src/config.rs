use tracing::info;

use crate::{
    builder::{Builder, Multiway, RootEdge},
    error::{Error, Result},
    rewrite::Sharing,
    term::Term,
};

pub const DEFAULT_ROUNDS: usize = 9;

#[derive(Debug)]
pub struct Config {
    pub root: Term,
    /// Number of generations to register, the root's included.
    pub rounds: usize,
    pub root_edge: RootEdge,
    pub sharing: Sharing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: Term::node(Term::a(), Term::b()),
            rounds: DEFAULT_ROUNDS,
            root_edge: RootEdge::default(),
            sharing: Sharing::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(Error::Config("at least one round is required".into()));
        }
        Ok(())
    }

    /// A builder over a fresh copy of the root, with no round run yet.
    pub fn builder(&self) -> Result<Builder> {
        self.validate()?;
        info!(
            root = %self.root,
            rounds = self.rounds,
            root_edge = ?self.root_edge,
            sharing = ?self.sharing,
            "exploring"
        );
        Ok(Builder::new(self.root.copy(), self.root_edge, self.sharing))
    }

    /// Runs the generation loop from a fresh copy of the root.
    pub fn explore(&self) -> Result<Multiway> {
        let mut builder = self.builder()?;
        builder.run(self.rounds);
        Ok(builder.finish())
    }
}
