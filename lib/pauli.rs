//! Pauli-string observables.
//!
//! A [`PauliString`] is a tensor product of single-qubit Pauli operators over
//! a fixed number of qubits. String labels are little-endian: the rightmost
//! character acts on qubit 0, so `"IIZ"` is *Z* on qubit 0 of a three-qubit
//! register.

use std::{ fmt, str::FromStr };
use itertools::Itertools;
use num_complex::Complex64 as C64;
use thiserror::Error;
use crate::c;

#[derive(Debug, Error)]
pub enum PauliError {
    #[error("invalid Pauli character {0:?}")]
    InvalidChar(char),

    #[error("qubit {0} is out of range for a {1}-qubit operator")]
    QubitOutOfRange(usize, usize),
}
pub type PauliResult<T> = Result<T, PauliError>;

/// A single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    /// Return the action of `self` on computational basis state `∣b⟩`, as the
    /// output bit and the accompanying phase.
    pub fn act(self, b: bool) -> (bool, C64) {
        match (self, b) {
            (Self::I, b) => (b, c!(1.0)),
            (Self::X, b) => (!b, c!(1.0)),
            (Self::Y, false) => (true, c!(i 1.0)),
            (Self::Y, true) => (false, c!(i (-1.0))),
            (Self::Z, false) => (false, c!(1.0)),
            (Self::Z, true) => (true, c!(-1.0)),
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
        }
    }
}

impl TryFrom<char> for Pauli {
    type Error = PauliError;

    fn try_from(ch: char) -> PauliResult<Self> {
        match ch.to_ascii_uppercase() {
            'I' => Ok(Self::I),
            'X' => Ok(Self::X),
            'Y' => Ok(Self::Y),
            'Z' => Ok(Self::Z),
            _ => Err(PauliError::InvalidChar(ch)),
        }
    }
}

/// A tensor product of single-qubit Pauli operators.
///
/// Stored in qubit order (index `k` acts on qubit `k`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PauliString(Vec<Pauli>);

impl PauliString {
    /// Create the identity on `n` qubits.
    pub fn identity(n: usize) -> Self { Self(vec![Pauli::I; n]) }

    /// Create the operator acting as `p` on qubit `k` of an `n`-qubit
    /// register and as the identity everywhere else.
    pub fn single(p: Pauli, k: usize, n: usize) -> PauliResult<Self> {
        if k >= n { return Err(PauliError::QubitOutOfRange(k, n)); }
        let mut ops = vec![Pauli::I; n];
        ops[k] = p;
        Ok(Self(ops))
    }

    /// Create *Z* on qubit `k` of an `n`-qubit register.
    pub fn z(k: usize, n: usize) -> PauliResult<Self> {
        Self::single(Pauli::Z, k, n)
    }

    /// Return the number of qubits `self` acts on.
    pub fn num_qubits(&self) -> usize { self.0.len() }

    /// Return the operator acting on qubit `k`, if it exists.
    pub fn get(&self, k: usize) -> Option<Pauli> { self.0.get(k).copied() }

    /// Return the single-qubit operators in qubit order.
    pub fn ops(&self) -> &[Pauli] { &self.0 }

    /// Return `true` if `self` contains only *I* and *Z*, i.e. is diagonal in
    /// the computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.0.iter().all(|p| matches!(p, Pauli::I | Pauli::Z))
    }

    /// Return the action of `self` on the computational basis state whose
    /// qubit `k` is bit `k` of `idx`, as the output basis index and phase.
    pub fn act(&self, idx: usize) -> (usize, C64) {
        self.0.iter().enumerate()
            .fold((idx, c!(1.0)), |(out, ph), (k, p)| {
                let (b, f) = p.act(idx >> k & 1 == 1);
                let out =
                    if b { out | (1_usize << k) } else { out & !(1_usize << k) };
                (out, ph * f)
            })
    }
}

impl FromStr for PauliString {
    type Err = PauliError;

    fn from_str(s: &str) -> PauliResult<Self> {
        let ops: Vec<Pauli> =
            s.chars().rev()
            .map(Pauli::try_from)
            .collect::<PauliResult<_>>()?;
        Ok(Self(ops))
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().rev().map(|p| p.as_char()).join(""))
    }
}
