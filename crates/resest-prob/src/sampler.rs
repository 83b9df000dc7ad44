use std::collections::HashSet;

use rand::seq::index;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplerError {
    #[error("Cannot walk an empty population")]
    EmptyPopulation,
    #[error("Partial view degree must be positive")]
    ZeroDegree,
    #[error("All {population} nodes already visited; no hop is possible")]
    Exhausted { population: usize },
}

/// Node identities already sampled by the current walk.
///
/// Every id must lie in the population's index range.
#[derive(Debug, Clone)]
pub struct VisitedSet {
    ids: HashSet<usize>,
}

impl VisitedSet {
    /// A fresh set holding only the observer, which is never sampled.
    pub fn new(observer: usize) -> Self {
        let mut ids = HashSet::new();
        ids.insert(observer);
        Self { ids }
    }

    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `false` if `id` was already present.
    pub fn insert(&mut self, id: usize) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Draw a partial view of `degree` distinct ids from `0..population`.
///
/// The view is independent of visitation state; when `degree` exceeds the
/// population the whole index range is visible.
pub fn partial_view<R: Rng + ?Sized>(rng: &mut R, population: usize, degree: usize) -> Vec<usize> {
    index::sample(rng, population, degree.min(population)).into_vec()
}

/// Advance the walk by one hop.
///
/// Repeatedly draws a partial view and proposes one of its members until the
/// proposal has not been visited yet, then marks it visited and returns it.
/// Rejected proposals are not hops; bounding the number of hops is up to the
/// caller.
///
/// # Errors
/// Only for preconditions under which no hop can ever be accepted: an empty
/// population, a zero degree, or a visited set covering every node.
pub fn next_hop<R: Rng + ?Sized>(
    rng: &mut R,
    population: usize,
    visited: &mut VisitedSet,
    degree: usize,
) -> Result<usize, SamplerError> {
    if population == 0 {
        return Err(SamplerError::EmptyPopulation);
    }
    if degree == 0 {
        return Err(SamplerError::ZeroDegree);
    }
    // Visited ids are always drawn from `0..population`, so a full set
    // means there is nothing left to propose.
    if visited.len() >= population {
        return Err(SamplerError::Exhausted { population });
    }

    loop {
        let view = partial_view(rng, population, degree);
        let proposal = view[rng.gen_range(0..view.len())];
        if visited.insert(proposal) {
            return Ok(proposal);
        }
    }
}
