//! Genomes and population snapshots
//!
//! A population is an immutable snapshot shared behind `Arc` by every
//! evaluation of one generation. Organism identity is pointer identity:
//! two organisms with identical weights in different slots are distinct.

use std::sync::Arc;

/// Population entry: an identity paired with one evaluable organism
#[derive(Debug)]
pub struct Genome<O> {
    pub id: u64,
    pub organism: Arc<O>,
}

impl<O> Clone for Genome<O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            organism: Arc::clone(&self.organism),
        }
    }
}

impl<O> Genome<O> {
    /// Create a genome wrapping an organism
    pub fn new(id: u64, organism: impl Into<Arc<O>>) -> Self {
        Self {
            id,
            organism: organism.into(),
        }
    }

    /// Check if this genome holds exactly the given organism (identity, not value)
    pub fn holds(&self, organism: &Arc<O>) -> bool {
        Arc::ptr_eq(&self.organism, organism)
    }
}

/// Read-only population snapshot for one generation
#[derive(Debug)]
pub struct Population<O> {
    generation: u64,
    genomes: Vec<Genome<O>>,
}

impl<O> Clone for Population<O> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            genomes: self.genomes.clone(),
        }
    }
}

impl<O> Population<O> {
    /// Create a snapshot from existing genomes
    pub fn new(generation: u64, genomes: Vec<Genome<O>>) -> Self {
        Self { generation, genomes }
    }

    /// Create a snapshot from organisms, assigning sequential genome ids
    pub fn from_organisms<I, T>(generation: u64, organisms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arc<O>>,
    {
        let genomes = organisms
            .into_iter()
            .enumerate()
            .map(|(i, organism)| Genome::new(i as u64, organism))
            .collect();
        Self { generation, genomes }
    }

    /// Generation this snapshot belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Genome<O>> {
        self.genomes.get(index)
    }

    /// Organism at a population slot
    pub fn organism(&self, index: usize) -> Option<&Arc<O>> {
        self.genomes.get(index).map(|g| &g.organism)
    }

    pub fn genomes(&self) -> &[Genome<O>] {
        &self.genomes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genome<O>> {
        self.genomes.iter()
    }

    /// First slot holding the given organism
    pub fn index_of(&self, organism: &Arc<O>) -> Option<usize> {
        self.genomes.iter().position(|g| g.holds(organism))
    }

    pub fn contains(&self, organism: &Arc<O>) -> bool {
        self.index_of(organism).is_some()
    }

    /// Number of slots whose organism is not the given one
    pub fn distinct_from(&self, organism: &Arc<O>) -> usize {
        self.genomes.iter().filter(|g| !g.holds(organism)).count()
    }
}
