//! Dense state-vector simulation.
//!
//! Amplitudes are stored in a single [`nd::Array1`] of length 2<sup>*n*</sup>,
//! indexed so that bit `k` of an index is the state of qubit `k`.

use ndarray as nd;
use num_complex::Complex64 as C64;
use tracing::trace;
use crate::{
    c,
    circuit::{ Axis, Circuit, CircuitOp, Gate },
    pauli::PauliString,
};
use super::{ Estimator, EstimatorError, EstimatorResult };

/// Largest register [`StatevectorEstimator`] will simulate by default.
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Largest register a [`StateVector`] can address at all: 2<sup>*n*</sup>
/// amplitudes of 16 bytes each must fit in `isize`.
pub const WIDTH_LIMIT: usize = usize::BITS as usize - 5;

// 2x2 matrix of exp(-i θ σ / 2), row-major
fn rot_matrix(axis: Axis, angle: f64) -> [[C64; 2]; 2] {
    let (s, cs) = (angle / 2.0).sin_cos();
    match axis {
        Axis::X => [
            [c!(cs),       c!(i (-s))],
            [c!(i (-s)),   c!(cs)    ],
        ],
        Axis::Y => [
            [c!(cs),       c!(-s)    ],
            [c!(s),        c!(cs)    ],
        ],
        Axis::Z => [
            [c!(1.0, e (-angle / 2.0)), c!(0.0)                  ],
            [c!(0.0),                   c!(1.0, e (angle / 2.0)) ],
        ],
    }
}

/// A pure state of a register of qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amps: nd::Array1<C64>,
}

impl StateVector {
    /// Create `∣0…0⟩` on `num_qubits` qubits.
    ///
    /// Fails with [`EstimatorError::TooManyQubits`] if `num_qubits` exceeds
    /// [`WIDTH_LIMIT`].
    pub fn zero(num_qubits: usize) -> EstimatorResult<Self> {
        if num_qubits > WIDTH_LIMIT {
            return Err(EstimatorError::TooManyQubits(num_qubits, WIDTH_LIMIT));
        }
        let mut amps: nd::Array1<C64> =
            nd::Array1::zeros(1_usize << num_qubits);
        amps[0] = c!(1.0);
        Ok(Self { num_qubits, amps })
    }

    /// Simulate `circuit` from `∣0…0⟩`.
    pub fn from_circuit(circuit: &Circuit) -> EstimatorResult<Self> {
        let mut state = Self::zero(circuit.num_qubits())?;
        circuit.ops().iter().for_each(|op| state.apply_op(op));
        Ok(state)
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.num_qubits }

    /// Return the amplitude array.
    pub fn amps(&self) -> &nd::Array1<C64> { &self.amps }

    /// Return the squared norm, which should always be 1 up to rounding.
    pub fn norm_sqr(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Apply a single circuit operation. Barriers do nothing.
    pub fn apply_op(&mut self, op: &CircuitOp) {
        if let CircuitOp::Gate(gate) = op { self.apply_gate(gate); }
    }

    /// Apply a gate.
    ///
    /// The gate is assumed to have been validated by [`Circuit::apply`];
    /// qubit indices beyond the register are ignored.
    pub fn apply_gate(&mut self, gate: &Gate) {
        let t = gate.target();
        if t >= self.num_qubits { return; }
        let cmask: usize =
            gate.controls().iter()
            .filter(|c| **c < self.num_qubits)
            .fold(0, |acc, &c| acc | (1_usize << c));
        let u = rot_matrix(gate.axis(), gate.angle());
        let tbit: usize = 1 << t;
        for i in 0..self.amps.len() {
            if i & tbit != 0 || i & cmask != cmask { continue; }
            let j = i | tbit;
            let (a0, a1) = (self.amps[i], self.amps[j]);
            self.amps[i] = u[0][0] * a0 + u[0][1] * a1;
            self.amps[j] = u[1][0] * a0 + u[1][1] * a1;
        }
    }

    /// Compute `⟨ψ|O|ψ⟩`.
    pub fn expectation(&self, obs: &PauliString) -> EstimatorResult<f64> {
        if obs.num_qubits() != self.num_qubits {
            return Err(EstimatorError::WidthMismatch {
                circuit: self.num_qubits,
                observable: obs.num_qubits(),
            });
        }
        let ev: C64 =
            self.amps.iter().enumerate()
            .map(|(i, a)| {
                let (j, ph) = obs.act(i);
                self.amps[j].conj() * ph * a
            })
            .sum();
        Ok(ev.re)
    }
}

/// Exact, shot-free estimator backed by [`StateVector`].
///
/// Consecutive pairs that share a circuit are simulated only once.
#[derive(Copy, Clone, Debug)]
pub struct StatevectorEstimator {
    max_qubits: usize,
}

impl Default for StatevectorEstimator {
    fn default() -> Self { Self::new() }
}

impl StatevectorEstimator {
    /// Create a new estimator with the [default qubit
    /// limit][DEFAULT_MAX_QUBITS].
    pub fn new() -> Self { Self { max_qubits: DEFAULT_MAX_QUBITS } }

    /// Set the largest register that will be simulated.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }
}

impl Estimator for StatevectorEstimator {
    fn run(&mut self, pubs: &[(&Circuit, &PauliString)])
        -> EstimatorResult<Vec<f64>>
    {
        let mut cached: Option<(&Circuit, StateVector)> = None;
        let mut values: Vec<f64> = Vec::with_capacity(pubs.len());
        for &(circuit, obs) in pubs.iter() {
            let n = circuit.num_qubits();
            if n > self.max_qubits {
                return Err(EstimatorError::TooManyQubits(n, self.max_qubits));
            }
            let hit = cached.as_ref()
                .is_some_and(|(prev, _)| std::ptr::eq(*prev, circuit));
            if !hit {
                trace!(
                    qubits = n,
                    ops = circuit.len(),
                    "simulating circuit"
                );
                cached = Some((circuit, StateVector::from_circuit(circuit)?));
            }
            if let Some((_, state)) = cached.as_ref() {
                values.push(state.expectation(obs)?);
            }
        }
        Ok(values)
    }
}
