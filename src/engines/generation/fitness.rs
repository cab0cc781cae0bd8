use crate::engines::generation::candidate::Candidate;
use crate::engines::generation::template::Template;
use crate::types::NoteEvent;

/// Distance between a gene and the template gene at the same position:
/// `|command| + |pitch| + |tick|` differences, commands compared by status code.
///
/// The result is also written into `gene.fitness`.
pub fn gene_fitness(gene: &mut NoteEvent, target: &NoteEvent) -> u64 {
    let command = u64::from(target.command.code().abs_diff(gene.command.code()));
    let pitch = u64::from(target.pitch.abs_diff(gene.pitch));
    let tick = target.tick.abs_diff(gene.tick);

    gene.fitness = command + pitch + tick;
    gene.fitness
}

/// Aggregate distance of a candidate, stored into the candidate and returned.
///
/// With `full_recompute` every gene is measured again against the template.
/// Without it the cached per-gene values are summed as they are, which is
/// valid whenever every gene's cache is already current (after crossover,
/// or after mutation re-measured the genes it touched).
pub fn candidate_fitness(candidate: &mut Candidate, template: &Template, full_recompute: bool) -> u128 {
    let total = if full_recompute {
        candidate
            .genes
            .iter_mut()
            .zip(template.genes())
            .map(|(gene, target)| u128::from(gene_fitness(gene, target)))
            .sum()
    } else {
        candidate.genes.iter().map(|gene| u128::from(gene.fitness)).sum()
    };

    candidate.fitness = total;
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Command;

    fn note(command: Command, pitch: u8, tick: u64) -> NoteEvent {
        NoteEvent::new(command, pitch, tick, 0)
    }

    #[test]
    fn test_identical_gene_scores_zero() {
        let target = note(Command::NoteOn, 60, 120);
        let mut gene = target;
        gene.fitness = 99;
        assert_eq!(gene_fitness(&mut gene, &target), 0);
        assert_eq!(gene.fitness, 0);
    }

    #[test]
    fn test_each_field_contributes_absolute_difference() {
        let target = note(Command::NoteOn, 60, 100);

        let mut pitch_only = note(Command::NoteOn, 67, 100);
        assert_eq!(gene_fitness(&mut pitch_only, &target), 7);

        let mut tick_only = note(Command::NoteOn, 60, 40);
        assert_eq!(gene_fitness(&mut tick_only, &target), 60);

        let mut command_only = note(Command::NoteOff, 60, 100);
        assert_eq!(gene_fitness(&mut command_only, &target), 16);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = note(Command::NoteOff, 10, 5);
        let b = note(Command::NoteOn, 100, 500);
        let mut a_copy = a;
        let mut b_copy = b;
        assert_eq!(gene_fitness(&mut a_copy, &b), gene_fitness(&mut b_copy, &a));
    }

    #[test]
    fn test_summation_uses_cached_values() {
        let template = Template::new(
            vec![note(Command::NoteOn, 60, 0), note(Command::NoteOff, 60, 10)],
            0,
        )
        .unwrap();
        let mut candidate = Candidate::from_genes(
            vec![note(Command::NoteOn, 61, 0), note(Command::NoteOff, 60, 12)],
            &template,
        )
        .unwrap();
        assert_eq!(candidate.fitness(), 3);

        // A stale cache is summed as-is until a full recompute.
        candidate.genes[0].fitness = 50;
        assert_eq!(candidate_fitness(&mut candidate, &template, false), 52);
        assert_eq!(candidate_fitness(&mut candidate, &template, true), 3);
    }
}
