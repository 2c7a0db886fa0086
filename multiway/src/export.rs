//! Hand-off to the analysis stages.
//!
//! Ranking, spectral reduction and plotting happen outside this crate. They
//! receive a [`GraphDocument`] through the [`Consumer`] trait, after the
//! exploration has finished, so nothing they do can touch the graph itself.

use std::io::Write;

use serde::Serialize;

use crate::{
    builder::{Builder, Multiway, Stats},
    error::Result,
    registry::StateId,
};

/// Which reduction the consumer should apply to the adjacency.
#[derive(PartialEq, Eq, Clone, Copy, Default, Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Pca,
    Eigen,
}

#[derive(PartialEq, Eq, Serialize, Debug)]
pub struct StateEntry {
    pub id: StateId,
    pub canonical: String,
}

#[derive(PartialEq, Eq, Serialize, Debug)]
pub struct EdgeEntry {
    pub a: StateId,
    pub b: StateId,
    pub weight: u64,
}

#[derive(Serialize, Debug)]
pub struct GraphDocument {
    pub view: View,
    pub states: Vec<StateEntry>,
    pub edges: Vec<EdgeEntry>,
    pub stats: Stats,
}

impl GraphDocument {
    pub fn new(multiway: &Multiway, view: View) -> Self {
        Self {
            view,
            states: multiway
                .registry()
                .iter()
                .map(|(id, canonical)| StateEntry {
                    id,
                    canonical: canonical.to_string(),
                })
                .collect(),
            edges: multiway
                .graph()
                .edges()
                .map(|(a, b, weight)| EdgeEntry { a, b, weight })
                .collect(),
            stats: multiway.stats().clone(),
        }
    }
}

pub trait Consumer {
    fn consume(&mut self, document: &GraphDocument) -> Result<()>;
}

/// Writes the document as pretty-printed JSON.
pub struct JsonSink<W>(pub W);

impl<W: Write> Consumer for JsonSink<W> {
    fn consume(&mut self, document: &GraphDocument) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.0, document)?;
        writeln!(self.0)?;
        self.0.flush()?;
        Ok(())
    }
}

/// Human-readable report: the counters, then up to `limit` states.
pub struct Summary<W> {
    pub out: W,
    pub limit: usize,
}

impl<W: Write> Consumer for Summary<W> {
    fn consume(&mut self, document: &GraphDocument) -> Result<()> {
        let stats = &document.stats;
        writeln!(self.out, "rounds:      {}", stats.rounds)?;
        writeln!(self.out, "generations: {:?}", stats.generation_sizes)?;
        writeln!(self.out, "instances:   {}", stats.instances)?;
        writeln!(self.out, "states:      {}", stats.states)?;
        writeln!(self.out, "edges:       {}", stats.edges)?;
        writeln!(self.out, "transitions: {}", stats.transitions)?;
        for state in document.states.iter().take(self.limit) {
            writeln!(self.out, "{:>6}  {}", state.id.index(), state.canonical)?;
        }
        if document.states.len() > self.limit {
            writeln!(
                self.out,
                "   ...  ({} more)",
                document.states.len() - self.limit
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Runs `rounds` more rounds on `builder`, writing every registered term
/// instance on its own line as each generation is registered. Repeated forms
/// are written once per instance.
pub fn write_instances<W: Write>(
    builder: &mut Builder,
    rounds: usize,
    mut out: W,
) -> Result<()> {
    for _ in 0..rounds {
        builder.round();
        for term in builder.generation() {
            writeln!(out, "{term}")?;
        }
    }
    out.flush()?;
    Ok(())
}
