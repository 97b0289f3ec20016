//! Weighted random task selection.
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use vecload_core::ConfigError;

/// A set of tasks with relative weights.
///
/// On every tick a user picks one task with probability `weight / sum(weights)`. Tasks with a
/// weight of zero are never picked.
#[derive(Clone, Debug)]
pub struct TaskSet<T> {
    tasks: Vec<(T, u32)>,
    index: WeightedIndex<u32>,
}

impl<T: Copy> TaskSet<T> {
    pub fn new<I>(tasks: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (T, u32)>,
    {
        let tasks: Vec<_> = tasks.into_iter().collect();
        if tasks.is_empty() {
            return Err(ConfigError::NoTasks);
        }
        if tasks.iter().all(|(_, weight)| *weight == 0) {
            return Err(ConfigError::ZeroWeights);
        }

        let index = WeightedIndex::new(tasks.iter().map(|(_, weight)| *weight))
            .map_err(|_| ConfigError::ZeroWeights)?;

        Ok(Self { tasks, index })
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.tasks[self.index.sample(rng)].0
    }

    pub fn weights(&self) -> impl Iterator<Item = (T, u32)> + '_ {
        self.tasks.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_empty_set() {
        let res = TaskSet::<u8>::new([]);
        assert!(matches!(res, Err(ConfigError::NoTasks)));
    }

    #[test]
    fn rejects_all_zero_weights() {
        let res = TaskSet::new([('a', 0), ('b', 0)]);
        assert!(matches!(res, Err(ConfigError::ZeroWeights)));
    }

    #[test]
    #[ntest::timeout(1000)]
    fn zero_weight_never_picked() {
        let set = TaskSet::new([('a', 1), ('b', 0), ('c', 3)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..10_000 {
            assert_ne!(set.pick(&mut rng), 'b');
        }
    }

    #[test]
    #[ntest::timeout(1000)]
    fn equal_weights_are_roughly_uniform() {
        let set = TaskSet::new([(0usize, 1), (1, 1), (2, 1)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut counts = [0u32; 3];
        for _ in 0..30_000 {
            counts[set.pick(&mut rng)] += 1;
        }
        for count in counts {
            assert!((9_000..=11_000).contains(&count), "{counts:?}");
        }
    }

    #[test]
    #[ntest::timeout(1000)]
    fn heavier_task_picked_more() {
        let set = TaskSet::new([('a', 1), ('b', 9)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let b_count = (0..10_000).filter(|_| set.pick(&mut rng) == 'b').count();
        assert!((8_500..=9_500).contains(&b_count), "{b_count}");
    }

    #[test]
    fn exposes_weights() {
        let set = TaskSet::new([('a', 2), ('b', 5)]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.weights().collect::<Vec<_>>(), [('a', 2), ('b', 5)]);
    }
}
