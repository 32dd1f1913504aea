//! Expectation-value estimation for circuits.
//!
//! The [`Estimator`] trait is the only way the rest of the crate learns
//! anything about the state a [`Circuit`] prepares. [`StatevectorEstimator`]
//! is the exact, in-process implementation.

use thiserror::Error;
use crate::{ circuit::Circuit, pauli::PauliString };

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("observable acts on {observable} qubit(s), but the circuit has {circuit}")]
    WidthMismatch { circuit: usize, observable: usize },

    #[error("cannot simulate {0} qubits (maximum is {1})")]
    TooManyQubits(usize, usize),

    #[error("backend error: {0}")]
    Backend(String),
}
pub type EstimatorResult<T> = Result<T, EstimatorError>;

pub mod statevec;
pub use statevec::{ StateVector, StatevectorEstimator };

/// Computes expectation values of observables against the states prepared by
/// circuits.
pub trait Estimator {
    /// Estimate `⟨ψ|O|ψ⟩` for every `(circuit, O)` pair, where `∣ψ⟩` is the
    /// state prepared by applying every gate of `circuit` to `∣0…0⟩`.
    ///
    /// Returns exactly one value per pair, in the same order.
    fn run(&mut self, pubs: &[(&Circuit, &PauliString)])
        -> EstimatorResult<Vec<f64>>;
}

impl<E> Estimator for &mut E
where E: Estimator + ?Sized
{
    fn run(&mut self, pubs: &[(&Circuit, &PauliString)])
        -> EstimatorResult<Vec<f64>>
    {
        (**self).run(pubs)
    }
}

impl<E> Estimator for Box<E>
where E: Estimator + ?Sized
{
    fn run(&mut self, pubs: &[(&Circuit, &PauliString)])
        -> EstimatorResult<Vec<f64>>
    {
        (**self).run(pubs)
    }
}
