/// Deterministic seat orders: entry `[seat] = agent index`.
///
/// The first `seats` orders are the cyclic rotations, so any count of at least
/// `seats` puts every agent in every seat. Further orders come from the
/// swap-based enumeration, skipping rotations already taken.
pub struct SeatPermutations {
    permutations: Vec<Vec<usize>>,
}

impl SeatPermutations {
    pub fn new(seats: usize, count: usize) -> Self {
        let total = max_permutations(seats);
        let limit = count.min(total);
        let mut permutations: Vec<Vec<usize>> = (0..seats.min(limit))
            .map(|shift| (0..seats).map(|seat| (seat + shift) % seats).collect())
            .collect();

        if seats > 0 && permutations.len() < limit {
            let mut base: Vec<usize> = (0..seats).collect();
            let mut candidates = Vec::new();
            generate(
                &mut base,
                0,
                limit.saturating_add(seats).min(total),
                &mut candidates,
            );
            let needed = limit - permutations.len();
            let extra: Vec<Vec<usize>> = candidates
                .into_iter()
                .filter(|order| !permutations.contains(order))
                .take(needed)
                .collect();
            permutations.extend(extra);
        }

        Self { permutations }
    }

    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.permutations
    }
}

/// `seats!`, saturating at `usize::MAX`.
pub fn max_permutations(seats: usize) -> usize {
    (2..=seats).fold(1usize, |acc, n| acc.saturating_mul(n))
}

fn generate(data: &mut [usize], start: usize, limit: usize, output: &mut Vec<Vec<usize>>) {
    if output.len() >= limit {
        return;
    }

    if start == data.len() - 1 {
        output.push(data.to_vec());
        return;
    }

    for idx in start..data.len() {
        data.swap(start, idx);
        generate(data, start + 1, limit, output);
        data.swap(start, idx);
        if output.len() >= limit {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_permutation_is_identity() {
        let perms = SeatPermutations::new(4, 1);
        assert_eq!(perms.as_slice(), &[vec![0, 1, 2, 3]]);
    }

    #[test]
    fn caps_at_all_orderings() {
        assert_eq!(SeatPermutations::new(3, 100).as_slice().len(), 6);
        assert_eq!(SeatPermutations::new(2, 5).as_slice().len(), 2);
    }

    #[test]
    fn orderings_are_unique() {
        let mut seen = SeatPermutations::new(4, 24).as_slice().to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn every_agent_visits_every_seat() {
        for count in [4, 6] {
            let perms = SeatPermutations::new(4, count);
            assert_eq!(perms.as_slice().len(), count);
            for seat in 0..4 {
                let mut agents: Vec<usize> =
                    perms.as_slice().iter().map(|order| order[seat]).collect();
                agents.sort_unstable();
                agents.dedup();
                assert_eq!(agents, vec![0, 1, 2, 3], "seat {seat} with {count} orders");
            }
        }
    }

    #[test]
    fn rotations_lead_the_list() {
        let perms = SeatPermutations::new(3, 6);
        assert_eq!(
            &perms.as_slice()[..3],
            &[vec![0, 1, 2], vec![1, 2, 0], vec![2, 0, 1]]
        );
    }

    #[test]
    fn factorial_saturates() {
        assert_eq!(max_permutations(4), 24);
        assert_eq!(max_permutations(52), usize::MAX);
    }
}
