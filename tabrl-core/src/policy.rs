//! Tabular softmax policy.
use crate::{table::argmax, CellKind, Env, PolicyTable, State, StateActionTable, ValueTable};
use log::warn;
use ndarray::{Array1, ArrayBase, Data, Ix1};
use rand::{distributions::WeightedIndex, Rng};
use serde::{Deserialize, Serialize};

/// Smallest unnormalized weight of an action.
const WEIGHT_FLOOR: f64 = 1e-300;

/// Numerically stable softmax.
///
/// The maximum logit is subtracted before exponentiation and every weight is
/// floored at `1e-300` before normalization, so for any finite input the output is
/// finite, strictly positive and sums to one.
pub fn softmax<S: Data<Elem = f64>>(logits: &ArrayBase<S, Ix1>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |m, &l| m.max(l));
    let weights = logits.mapv(|l| (l - max).exp().max(WEIGHT_FLOOR));
    let sum = weights.sum();
    weights / sum
}

/// How an action is chosen from a [`SoftmaxPolicy`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub enum ActionSelection {
    /// Sample from the softmax distribution.
    Stochastic,

    /// With probability `eps` take a uniformly random action, otherwise the greedy one.
    EpsilonGreedy(f64),

    /// Take the most probable action.
    Greedy,
}

/// A policy parameterized by one logit per state-action pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxPolicy {
    logits: StateActionTable,
}

impl SoftmaxPolicy {
    /// Creates a uniform policy, all logits being zero.
    pub fn new(n_rows: usize, n_cols: usize, n_actions: usize) -> Self {
        Self {
            logits: StateActionTable::zeros(n_rows, n_cols, n_actions),
        }
    }

    /// Creates a uniform policy with the shape of the given environment.
    pub fn uniform<E: Env>(env: &E) -> Self {
        Self::new(env.n_rows(), env.n_cols(), env.n_actions())
    }

    /// The logit table.
    pub fn logits(&self) -> &StateActionTable {
        &self.logits
    }

    /// The mutable logit table.
    pub fn logits_mut(&mut self) -> &mut StateActionTable {
        &mut self.logits
    }

    /// Number of actions.
    pub fn n_actions(&self) -> usize {
        self.logits.n_actions()
    }

    /// Action distribution at `s`.
    pub fn probs(&self, s: State) -> Array1<f64> {
        softmax(&self.logits.row(s))
    }

    /// Probability of taking `a` at `s`.
    pub fn prob(&self, s: State, a: usize) -> f64 {
        self.probs(s)[a]
    }

    /// The most probable action at `s`; the lowest index wins ties.
    pub fn greedy(&self, s: State) -> usize {
        argmax(&self.probs(s))
    }

    /// Samples an action from the distribution at `s`.
    pub fn sample<R: Rng>(&self, s: State, rng: &mut R) -> usize {
        let probs = self.probs(s);
        match WeightedIndex::new(probs.iter()) {
            Ok(dist) => rng.sample(dist),
            Err(e) => {
                // Only reachable when the logits are no longer finite.
                warn!("Invalid action distribution at {:?} ({}), acting greedily", s, e);
                argmax(&probs)
            }
        }
    }

    /// Chooses an action at `s` according to `selection`.
    pub fn select<R: Rng>(&self, s: State, selection: ActionSelection, rng: &mut R) -> usize {
        match selection {
            ActionSelection::Stochastic => self.sample(s, rng),
            ActionSelection::Greedy => self.greedy(s),
            ActionSelection::EpsilonGreedy(eps) => {
                if rng.gen::<f64>() < eps {
                    rng.gen_range(0..self.n_actions())
                } else {
                    self.greedy(s)
                }
            }
        }
    }

    /// `logits += alpha * grad`.
    pub fn apply(&mut self, grad: &StateActionTable, alpha: f64) {
        self.logits.add_scaled(grad, alpha);
    }

    /// Greedy action of every normal cell.
    pub fn greedy_policy<E: Env>(&self, env: &E) -> PolicyTable {
        let mut policy = PolicyTable::empty(env.n_rows(), env.n_cols());
        for s in env.states() {
            if env.kind(s) == CellKind::Normal {
                policy[s] = Some(self.greedy(s));
            }
        }
        policy
    }

    /// Iterative evaluation of this stochastic policy on `env`.
    ///
    /// Absorbing cells are pinned to their reward and walls stay at zero. Sweeps are
    /// synchronous and stop once the largest change is below `tol` or after `max_sweeps`.
    pub fn evaluate<E: Env>(&self, env: &E, tol: f64, max_sweeps: usize) -> ValueTable {
        let gamma = env.discount_factor();
        let mut v = ValueTable::zeros_like_env(env);
        for s in env.states() {
            if env.is_absorbing(s) {
                v[s] = env.reward(s);
            }
        }

        for _ in 0..max_sweeps {
            let mut v_new = v.clone();
            for s in env.states() {
                if env.is_absorbing(s) || env.is_wall(s) {
                    continue;
                }
                v_new[s] = self
                    .probs(s)
                    .iter()
                    .enumerate()
                    .map(|(a, p)| {
                        let s_next = env.transition(s, a);
                        p * (env.reward(s_next) + gamma * v[s_next])
                    })
                    .sum();
            }
            let delta = v_new.max_abs_diff(&v);
            v = v_new;
            if delta < tol {
                break;
            }
        }

        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_softmax_normalized_and_positive() {
        let cases: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![1.0, 2.0, 3.0, 4.0],
            vec![-1e3, 0.0, 1e3, 5.0],
            vec![700.0, 710.0, 720.0],
            vec![-3.5],
            vec![-1e3, 0.0, 1e3],
            vec![-1e300, 1e300],
        ];
        for logits in cases.iter() {
            let p = softmax(&arr1(logits));
            let sum = p.sum();
            assert!((sum - 1.0).abs() < 1e-9, "{:?} sums to {}", logits, sum);
            assert!(p.iter().all(|&x| x > 0.0), "{:?} gives {:?}", logits, p);
        }
    }

    #[test]
    fn test_softmax_preserves_order() {
        let logits = [0.3, -1.2, 2.5, 0.3, 1.0];
        let p = softmax(&arr1(&logits));
        for i in 0..logits.len() {
            for j in 0..logits.len() {
                if logits[i] > logits[j] {
                    assert!(p[i] >= p[j]);
                }
            }
        }
        assert_eq!(p[0], p[3]);
    }

    #[test]
    fn test_uniform_policy() {
        let policy = SoftmaxPolicy::new(2, 2, 4);
        for p in policy.probs((1, 1)).iter() {
            assert!((p - 0.25).abs() < 1e-12);
        }
        assert_eq!(policy.greedy((0, 0)), 0);
    }

    #[test]
    fn test_select() {
        let mut policy = SoftmaxPolicy::new(1, 1, 4);
        policy.logits_mut()[(0, 0, 2)] = 50.0;
        let rng = &mut StdRng::seed_from_u64(7);

        assert_eq!(policy.select((0, 0), ActionSelection::Greedy, rng), 2);
        for _ in 0..100 {
            assert_eq!(policy.select((0, 0), ActionSelection::Stochastic, rng), 2);
            assert_eq!(policy.select((0, 0), ActionSelection::EpsilonGreedy(0.0), rng), 2);
        }

        let n = 4000;
        let n_random = (0..n)
            .filter(|_| policy.select((0, 0), ActionSelection::EpsilonGreedy(1.0), rng) != 2)
            .count();
        // Uniform over 4 actions: 3/4 of the draws differ from the greedy action.
        assert!((n_random as f64 / n as f64 - 0.75).abs() < 0.05);
    }

    #[test]
    fn test_sample_frequencies() {
        let mut policy = SoftmaxPolicy::new(1, 1, 2);
        policy.logits_mut()[(0, 0, 1)] = (4f64).ln();
        let rng = &mut StdRng::seed_from_u64(42);
        let n = 10000;
        let n1 = (0..n).filter(|_| policy.sample((0, 0), rng) == 1).count();
        assert!((n1 as f64 / n as f64 - 0.8).abs() < 0.02);
    }
}
