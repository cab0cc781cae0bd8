use crate::engines::generation::candidate::Candidate;
use crate::engines::generation::template::Template;
use crate::error::MidiEvoError;
use crate::types::TimingMode;
use rand::Rng;

/// Fixed-capacity collection of candidates ranked best first.
///
/// Lower fitness ranks higher; ties keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    members: Vec<Candidate>,
    capacity: usize,
}

impl Population {
    /// Generation zero: `capacity` random candidates, ranked.
    pub fn initialize<R: Rng>(
        capacity: usize,
        template: &Template,
        timing: TimingMode,
        rng: &mut R,
    ) -> Self {
        let members = (0..capacity)
            .map(|_| Candidate::random(template, timing, rng))
            .collect();
        Self::from_members(members)
    }

    /// Rank existing candidates. Capacity becomes their count.
    pub fn from_members(members: Vec<Candidate>) -> Self {
        let capacity = members.len();
        let mut population = Self { members, capacity };
        population.sort();
        population
    }

    /// Drop the `offspring.len()` worst members, add the offspring and re-rank.
    ///
    /// The best `capacity - offspring.len()` incumbents always survive.
    pub fn replace_worst(&mut self, offspring: Vec<Candidate>) -> Result<(), MidiEvoError> {
        if offspring.len() > self.capacity {
            return Err(MidiEvoError::Configuration(format!(
                "{} offspring cannot replace members of a population of {}",
                offspring.len(),
                self.capacity
            )));
        }

        self.sort();
        let survivors = self.capacity - offspring.len();
        self.members.truncate(survivors);
        self.members.extend(offspring);
        self.sort();
        Ok(())
    }

    fn sort(&mut self) {
        self.members.sort_by_key(|candidate| candidate.fitness);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.members.first()
    }

    pub fn worst(&self) -> Option<&Candidate> {
        self.members.last()
    }

    /// Candidate at `rank`, 0 being the best.
    pub fn get(&self, rank: usize) -> Option<&Candidate> {
        self.members.get(rank)
    }

    pub fn members(&self) -> &[Candidate] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.members.iter()
    }

    pub fn fitness_values(&self) -> Vec<u128> {
        self.members.iter().map(Candidate::fitness).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Command, NoteEvent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn template() -> Template {
        Template::new(
            vec![
                NoteEvent::new(Command::NoteOn, 60, 0, 0),
                NoteEvent::new(Command::NoteOff, 60, 10, 0),
            ],
            0,
        )
        .unwrap()
    }

    fn candidate_with_pitch_offset(template: &Template, offset: u8) -> Candidate {
        let mut genes = template.genes().to_vec();
        genes[0].pitch += offset;
        Candidate::from_genes(genes, template).unwrap()
    }

    fn is_sorted(population: &Population) -> bool {
        population
            .fitness_values()
            .windows(2)
            .all(|pair| pair[0] <= pair[1])
    }

    #[test]
    fn test_initialize_fills_and_sorts() {
        let template = template();
        let mut rng = StdRng::seed_from_u64(1);
        let population = Population::initialize(40, &template, TimingMode::Evolved, &mut rng);
        assert_eq!(population.len(), 40);
        assert_eq!(population.capacity(), 40);
        assert!(is_sorted(&population));
    }

    #[test]
    fn test_replace_worst_removes_exactly_the_tail() {
        let template = template();
        let members = (0..6)
            .map(|offset| candidate_with_pitch_offset(&template, offset * 10))
            .collect();
        let mut population = Population::from_members(members);

        let offspring = vec![
            candidate_with_pitch_offset(&template, 5),
            candidate_with_pitch_offset(&template, 15),
            candidate_with_pitch_offset(&template, 25),
        ];
        population.replace_worst(offspring).unwrap();

        assert_eq!(population.len(), 6);
        assert_eq!(population.fitness_values(), vec![0, 5, 10, 15, 20, 25]);
    }

    #[test]
    fn test_replace_worst_keeps_elites_even_against_better_offspring() {
        let template = template();
        let members = (0..4)
            .map(|offset| candidate_with_pitch_offset(&template, offset + 1))
            .collect();
        let mut population = Population::from_members(members);

        population
            .replace_worst(vec![candidate_with_pitch_offset(&template, 0)])
            .unwrap();

        assert_eq!(population.fitness_values(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_replace_worst_rejects_oversized_offspring() {
        let template = template();
        let mut population = Population::from_members(vec![candidate_with_pitch_offset(&template, 1)]);
        let offspring = vec![
            candidate_with_pitch_offset(&template, 0),
            candidate_with_pitch_offset(&template, 0),
        ];
        assert!(population.replace_worst(offspring).is_err());
        assert_eq!(population.fitness_values(), vec![1]);
    }
}
