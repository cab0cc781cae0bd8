use crate::engines::generation::candidate::{random_command, random_pitch, random_tick, Candidate};
use crate::engines::generation::fitness::{candidate_fitness, gene_fitness};
use crate::engines::generation::population::Population;
use crate::engines::generation::template::Template;
use crate::types::{DiversityStrategy, TimingMode};
use rand::Rng;

/// Tournament selection: `rounds` times, pick the best of three random members.
///
/// Members are drawn with replacement and returned by reference, so one
/// candidate may appear several times in the pool.
pub fn tournament_selection<'a, R: Rng>(
    population: &'a Population,
    rounds: usize,
    rng: &mut R,
) -> Vec<&'a Candidate> {
    let members = population.members();
    if members.is_empty() {
        return Vec::new();
    }

    (0..rounds)
        .map(|_| {
            let a = &members[rng.gen_range(0..members.len())];
            let b = &members[rng.gen_range(0..members.len())];
            let c = &members[rng.gen_range(0..members.len())];

            let best = if a.fitness < b.fitness { a } else { b };
            if c.fitness < best.fitness {
                c
            } else {
                best
            }
        })
        .collect()
}

/// Uniform crossover: each position copies the gene of one parent picked by a fair coin.
///
/// Copied genes keep their cached distance, so the child's fitness is their sum.
pub fn uniform_crossover<R: Rng>(a: &Candidate, b: &Candidate, rng: &mut R) -> Candidate {
    let mut fitness = 0u128;
    let genes = a
        .genes
        .iter()
        .zip(&b.genes)
        .map(|(gene_a, gene_b)| {
            let gene = if rng.gen::<bool>() { *gene_a } else { *gene_b };
            fitness += u128::from(gene.fitness);
            gene
        })
        .collect();

    Candidate { genes, fitness }
}

/// One offspring per consecutive pair of the selection pool.
///
/// A trailing unpaired entry is dropped. Under `RandomOnStagnation`, a pair of
/// identical parents yields a fresh random candidate instead of a crossover.
pub fn recombine<R: Rng>(
    pool: &[&Candidate],
    template: &Template,
    timing: TimingMode,
    strategy: DiversityStrategy,
    rng: &mut R,
) -> Vec<Candidate> {
    pool.chunks_exact(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            if strategy == DiversityStrategy::RandomOnStagnation && a.is_identical(b) {
                Candidate::random(template, timing, rng)
            } else {
                uniform_crossover(a, b, rng)
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    Command,
    Pitch,
    Tick,
}

impl MutationTarget {
    /// Target drawn once per offspring; ticks only take part when timing evolves.
    pub fn choose<R: Rng>(timing: TimingMode, rng: &mut R) -> Self {
        let choices = match timing {
            TimingMode::Inherited => 2,
            TimingMode::Evolved => 3,
        };
        match rng.gen_range(0..choices) {
            0 => MutationTarget::Command,
            1 => MutationTarget::Pitch,
            _ => MutationTarget::Tick,
        }
    }
}

/// Mutation: redraw the chosen field of each gene with probability `rate`.
///
/// Touched genes are re-measured against the template, then the cached values
/// are summed into the candidate's fitness. Returns the number of genes changed.
pub fn mutate<R: Rng>(
    candidate: &mut Candidate,
    template: &Template,
    timing: TimingMode,
    rate: f64,
    rng: &mut R,
) -> usize {
    let target = MutationTarget::choose(timing, rng);
    let mut touched = 0;

    for (gene, reference) in candidate.genes.iter_mut().zip(template.genes()) {
        if rng.gen::<f64>() < rate {
            match target {
                MutationTarget::Command => gene.command = random_command(rng),
                MutationTarget::Pitch => gene.pitch = random_pitch(rng),
                MutationTarget::Tick => gene.tick = random_tick(template, rng),
            }
            gene_fitness(gene, reference);
            touched += 1;
        }
    }

    candidate_fitness(candidate, template, false);
    touched
}
