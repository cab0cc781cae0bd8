use crate::engines::generation::fitness::candidate_fitness;
use crate::engines::generation::template::Template;
use crate::error::TemplateError;
use crate::types::{Command, NoteEvent, TimingMode, MAX_PITCH};
use rand::Rng;

/// One individual: a fixed-length gene sequence aligned with the template.
///
/// `fitness` is the sum of the genes' cached distances. Every function that
/// builds or modifies a candidate leaves that sum current before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub(crate) genes: Vec<NoteEvent>,
    pub(crate) fitness: u128,
}

impl Candidate {
    /// Random candidate with full fitness computed against `template`.
    pub fn random<R: Rng>(template: &Template, timing: TimingMode, rng: &mut R) -> Self {
        let genes = template
            .genes()
            .iter()
            .map(|target| {
                let mut gene = random_gene(template, rng);
                if timing == TimingMode::Inherited {
                    gene.tick = target.tick;
                }
                gene
            })
            .collect();

        let mut candidate = Self { genes, fitness: 0 };
        candidate_fitness(&mut candidate, template, true);
        candidate
    }

    /// Wrap explicit genes and measure them against `template`.
    pub fn from_genes(genes: Vec<NoteEvent>, template: &Template) -> Result<Self, TemplateError> {
        if genes.len() != template.len() {
            return Err(TemplateError::LengthMismatch {
                expected: template.len(),
                actual: genes.len(),
            });
        }
        let mut candidate = Self { genes, fitness: 0 };
        candidate_fitness(&mut candidate, template, true);
        Ok(candidate)
    }

    pub fn genes(&self) -> &[NoteEvent] {
        &self.genes
    }

    pub fn fitness(&self) -> u128 {
        self.fitness
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// True when both candidates carry the same command, pitch and tick at every position.
    pub fn is_identical(&self, other: &Candidate) -> bool {
        self.genes.len() == other.genes.len()
            && self
                .genes
                .iter()
                .zip(&other.genes)
                .all(|(a, b)| a.same_note(b))
    }
}

/// Uniformly random gene on the template channel. Fitness cache is left at zero.
pub fn random_gene<R: Rng>(template: &Template, rng: &mut R) -> NoteEvent {
    let command = random_command(rng);
    let pitch = random_pitch(rng);
    let tick = random_tick(template, rng);
    NoteEvent::new(command, pitch, tick, template.channel())
}

pub fn random_command<R: Rng>(rng: &mut R) -> Command {
    Command::ALL[rng.gen_range(0..Command::ALL.len())]
}

pub fn random_pitch<R: Rng>(rng: &mut R) -> u8 {
    rng.gen_range(0..=MAX_PITCH)
}

pub fn random_tick<R: Rng>(template: &Template, rng: &mut R) -> u64 {
    rng.gen_range(0..=template.max_tick())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn template() -> Template {
        Template::new(
            vec![
                NoteEvent::new(Command::NoteOn, 60, 0, 1),
                NoteEvent::new(Command::NoteOff, 60, 10, 1),
                NoteEvent::new(Command::NoteOn, 64, 10, 1),
                NoteEvent::new(Command::NoteOff, 64, 20, 1),
            ],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_random_candidate_respects_domains() {
        let template = template();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let candidate = Candidate::random(&template, TimingMode::Evolved, &mut rng);
            assert_eq!(candidate.len(), template.len());
            for gene in candidate.genes() {
                assert!(gene.pitch <= MAX_PITCH);
                assert!(gene.tick <= template.max_tick());
                assert_eq!(gene.channel, 1);
            }
        }
    }

    #[test]
    fn test_inherited_timing_copies_template_ticks() {
        let template = template();
        let mut rng = StdRng::seed_from_u64(11);
        let candidate = Candidate::random(&template, TimingMode::Inherited, &mut rng);
        for (gene, target) in candidate.genes().iter().zip(template.genes()) {
            assert_eq!(gene.tick, target.tick);
        }
    }

    #[test]
    fn test_random_candidate_fitness_is_current() {
        let template = template();
        let mut rng = StdRng::seed_from_u64(3);
        let candidate = Candidate::random(&template, TimingMode::Evolved, &mut rng);
        let sum: u128 = candidate.genes().iter().map(|g| u128::from(g.fitness)).sum();
        assert_eq!(candidate.fitness(), sum);
    }

    #[test]
    fn test_is_identical_compares_note_content() {
        let template = template();
        let a = Candidate::from_genes(template.genes().to_vec(), &template).unwrap();
        let mut genes = template.genes().to_vec();
        genes[2].pitch = 65;
        let b = Candidate::from_genes(genes, &template).unwrap();
        assert!(a.is_identical(&a.clone()));
        assert!(!a.is_identical(&b));
    }

    #[test]
    fn test_from_genes_rejects_wrong_length() {
        let template = template();
        let mut genes = template.genes().to_vec();
        genes.pop();
        assert_eq!(
            Candidate::from_genes(genes, &template),
            Err(TemplateError::LengthMismatch {
                expected: template.len(),
                actual: template.len() - 1,
            })
        );
    }
}
