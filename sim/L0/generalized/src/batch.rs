//! Batched evaluation: N independent states sharing one [`Mechanism`].
//!
//! Every state has the same mechanism but its own `q`, `qd`, link poses and
//! actuation. Evaluation is parallelized across CPU cores via rayon when the
//! `parallel` feature is enabled; sequential fallback when disabled.
//!
//! # Examples
//!
//! ```
//! use sim_generalized::{BatchDynamics, GeneralizedState, Mechanism};
//! use std::sync::Arc;
//!
//! let mech = Arc::new(Mechanism::n_link_pendulum(3, 1.0, 0.1).unwrap());
//! let mut batch = BatchDynamics::new(Arc::clone(&mech), 16);
//!
//! for (i, state) in batch.states_mut().enumerate() {
//!     state.qd[0] = 0.1 * i as f64;
//! }
//!
//! let results = batch.evaluate_all();
//! assert!(results.iter().all(Result::is_ok));
//! ```

use std::sync::Arc;

use nalgebra::DVector;
use sim_spatial::Pose;

use crate::com::transform_com;
use crate::forward::{GeneralizedForces, forward_terms};
use crate::{Mechanism, Result};

/// One mechanism state: everything an evaluation reads besides the
/// mechanism itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizedState {
    /// Generalized position.
    pub q: DVector<f64>,
    /// Generalized velocity.
    pub qd: DVector<f64>,
    /// World pose of each link, consistent with `q`.
    pub x: Vec<Pose>,
    /// Actuation force per dof.
    pub tau: DVector<f64>,
}

impl GeneralizedState {
    /// Zero `q`, `qd` and `tau` with the given link poses.
    #[must_use]
    pub fn at_rest(mech: &Mechanism, x: Vec<Pose>) -> Self {
        let nv = mech.dof_count();
        Self {
            q: DVector::zeros(nv),
            qd: DVector::zeros(nv),
            x,
            tau: DVector::zeros(nv),
        }
    }

    /// Run [`transform_com`] and [`forward_terms`] for this state.
    pub fn evaluate(&self, mech: &Mechanism) -> Result<GeneralizedForces> {
        let frame = transform_com(mech, &self.q, &self.qd, &self.x)?;
        forward_terms(mech, &self.q, &self.qd, &frame, &self.tau)
    }
}

/// Batched evaluation over independent states of one [`Mechanism`].
///
/// # Single Mechanism Constraint
///
/// All states share the same [`Arc<Mechanism>`]; a state whose shapes don't
/// match it fails on its own without affecting the others.
#[derive(Debug, Clone)]
pub struct BatchDynamics {
    mechanism: Arc<Mechanism>,
    states: Vec<GeneralizedState>,
}

impl BatchDynamics {
    /// Create `n` states at rest, every link pose at the world origin.
    #[must_use]
    pub fn new(mechanism: Arc<Mechanism>, n: usize) -> Self {
        let rest = GeneralizedState::at_rest(
            &mechanism,
            vec![Pose::identity(); mechanism.link_count()],
        );
        Self {
            states: vec![rest; n],
            mechanism,
        }
    }

    /// Create a batch from explicit states.
    #[must_use]
    pub fn from_states(mechanism: Arc<Mechanism>, states: Vec<GeneralizedState>) -> Self {
        Self { mechanism, states }
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Shared mechanism reference.
    #[must_use]
    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    /// Immutable access to state `i`.
    #[must_use]
    pub fn state(&self, i: usize) -> Option<&GeneralizedState> {
        self.states.get(i)
    }

    /// Mutable access to state `i`.
    pub fn state_mut(&mut self, i: usize) -> Option<&mut GeneralizedState> {
        self.states.get_mut(i)
    }

    /// Iterator over all states.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &GeneralizedState> {
        self.states.iter()
    }

    /// Iterator over all states (mutable).
    pub fn states_mut(&mut self) -> impl ExactSizeIterator<Item = &mut GeneralizedState> {
        self.states.iter_mut()
    }

    /// Evaluate every state.
    ///
    /// Results are in state order. When the `parallel` feature is enabled,
    /// states are evaluated in parallel via rayon `par_iter`; otherwise
    /// sequentially with identical results.
    ///
    /// # Determinism
    ///
    /// Output is independent of thread count and scheduling order. Each
    /// result is a pure function of its own state and the shared mechanism.
    pub fn evaluate_all(&self) -> Vec<Result<GeneralizedForces>> {
        let mech = &*self.mechanism;

        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
            self.states
                .par_iter()
                .map(|state| state.evaluate(mech))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.states
                .iter()
                .map(|state| state.evaluate(mech))
                .collect()
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;
    use crate::DynamicsError;

    fn pendulum() -> Arc<Mechanism> {
        Arc::new(Mechanism::n_link_pendulum(2, 1.0, 0.5).unwrap())
    }

    #[test]
    fn new_creates_states_at_rest() {
        let batch = BatchDynamics::new(pendulum(), 4);
        assert_eq!(batch.len(), 4);
        assert!(!batch.is_empty());
        let state = batch.state(3).unwrap();
        assert_eq!(state.q, DVector::zeros(2));
        assert_eq!(state.x.len(), 2);
        assert!(batch.state(4).is_none());
    }

    #[test]
    fn empty_batch() {
        let batch = BatchDynamics::new(pendulum(), 0);
        assert!(batch.is_empty());
        assert!(batch.evaluate_all().is_empty());
    }

    #[test]
    fn batch_matches_single_evaluation() {
        let mech = pendulum();
        let mut batch = BatchDynamics::new(Arc::clone(&mech), 8);
        for (i, state) in batch.states_mut().enumerate() {
            state.qd[0] = 0.3 * i as f64;
            state.qd[1] = -0.1 * i as f64;
            state.tau[1] = 0.05 * i as f64;
        }

        let results = batch.evaluate_all();
        for (state, result) in batch.states().zip(&results) {
            let expected = state.evaluate(&mech).unwrap();
            assert_eq!(result.as_ref().unwrap(), &expected);
        }
    }

    #[test]
    fn failures_are_per_state() {
        let mut batch = BatchDynamics::new(pendulum(), 3);
        batch.state_mut(1).unwrap().qd = DVector::zeros(5);

        let results = batch.evaluate_all();
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(DynamicsError::ShapeMismatch { what: "qd", .. })
        ));
        assert!(results[2].is_ok());
    }
}
