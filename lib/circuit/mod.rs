//! Provides tools for conventional circuit notation.
//!
//! A [`Circuit`] is an ordered list of [operations][CircuitOp] on a register
//! of qubits whose size is fixed at creation. Nothing is simulated here;
//! circuits are handed to an [`Estimator`][crate::estimator::Estimator] for
//! evaluation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("error in gate: targeted qubit {0}, but the circuit only has {1}")]
    QubitOutOfRange(usize, usize),

    #[error("error in gate: qubit {0} appears more than once")]
    DuplicateQubit(usize),

    #[error("error in gate: multi-controlled rotation requires at least one control")]
    NoControls,

    #[error("error in gate: non-finite rotation angle {0}")]
    NonFiniteAngle(f64),
}
pub type CircuitResult<T> = Result<T, CircuitError>;
use CircuitError::*;

pub(crate) mod draw;
pub use draw::DrawStyle;

/// Rotation axis on the Bloch sphere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A unitary gate to apply in a quantum circuit.
///
/// All rotations are `exp(-i θ σ / 2)` for rotation angle `θ` and Pauli
/// operator `σ`.
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    /// Rotation about *x*.
    XRot(usize, f64),
    /// Rotation about *y*.
    YRot(usize, f64),
    /// Rotation about *z*.
    ZRot(usize, f64),
    /// Rotation about *x* on the second qubit, controlled by the first.
    CXRot(usize, usize, f64),
    /// Rotation about *y* on the second qubit, controlled by the first.
    CYRot(usize, usize, f64),
    /// Rotation about *x* on the second item, controlled jointly by all qubits
    /// in the first.
    MCXRot(Box<[usize]>, usize, f64),
}

impl Gate {
    /// Return `true` if `self` is `XRot`.
    pub fn is_xrot(&self) -> bool { matches!(self, Self::XRot(..)) }

    /// Return `true` if `self` is `YRot`.
    pub fn is_yrot(&self) -> bool { matches!(self, Self::YRot(..)) }

    /// Return `true` if `self` is `ZRot`.
    pub fn is_zrot(&self) -> bool { matches!(self, Self::ZRot(..)) }

    /// Return `true` if `self` is `CXRot`.
    pub fn is_cxrot(&self) -> bool { matches!(self, Self::CXRot(..)) }

    /// Return `true` if `self` is `CYRot`.
    pub fn is_cyrot(&self) -> bool { matches!(self, Self::CYRot(..)) }

    /// Return `true` if `self` is `MCXRot`.
    pub fn is_mcxrot(&self) -> bool { matches!(self, Self::MCXRot(..)) }

    /// Create a new rotation about `axis` on qubit `k`.
    pub fn rot(axis: Axis, k: usize, angle: f64) -> Self {
        match axis {
            Axis::X => Self::XRot(k, angle),
            Axis::Y => Self::YRot(k, angle),
            Axis::Z => Self::ZRot(k, angle),
        }
    }

    /// Create a new multi-controlled *x*-rotation on qubit `t`.
    pub fn mcxrot<I>(controls: I, t: usize, angle: f64) -> Self
    where I: IntoIterator<Item = usize>
    {
        Self::MCXRot(controls.into_iter().collect(), t, angle)
    }

    /// Return the rotation axis.
    pub fn axis(&self) -> Axis {
        match self {
            Self::XRot(..) | Self::CXRot(..) | Self::MCXRot(..) => Axis::X,
            Self::YRot(..) | Self::CYRot(..) => Axis::Y,
            Self::ZRot(..) => Axis::Z,
        }
    }

    /// Return the rotation angle.
    pub fn angle(&self) -> f64 {
        match self {
            Self::XRot(_, ang)
            | Self::YRot(_, ang)
            | Self::ZRot(_, ang)
            | Self::CXRot(_, _, ang)
            | Self::CYRot(_, _, ang)
            | Self::MCXRot(_, _, ang)
            => *ang,
        }
    }

    /// Return the index of the qubit the rotation acts on.
    pub fn target(&self) -> usize {
        match self {
            Self::XRot(k, _) | Self::YRot(k, _) | Self::ZRot(k, _) => *k,
            Self::CXRot(_, t, _) | Self::CYRot(_, t, _) => *t,
            Self::MCXRot(_, t, _) => *t,
        }
    }

    /// Return the indices of all control qubits, in the order given at
    /// construction.
    pub fn controls(&self) -> &[usize] {
        match self {
            Self::XRot(..) | Self::YRot(..) | Self::ZRot(..) => &[],
            Self::CXRot(c, ..) | Self::CYRot(c, ..)
                => std::slice::from_ref(c),
            Self::MCXRot(cc, ..) => &cc[..],
        }
    }
}

/// A generic circuit operation.
#[derive(Clone, Debug, PartialEq)]
pub enum CircuitOp {
    /// A unitary gate.
    Gate(Gate),
    /// An ordering fence across all qubits. Has no effect on the state.
    Barrier,
}

impl CircuitOp {
    /// Return `true` if `self` is `Gate`.
    pub fn is_gate(&self) -> bool { matches!(self, Self::Gate(_)) }

    /// Return `true` if `self` is `Barrier`.
    pub fn is_barrier(&self) -> bool { matches!(self, Self::Barrier) }

    /// Return the inner gate, if `self` is `Gate`.
    pub fn as_gate(&self) -> Option<&Gate> {
        match self {
            Self::Gate(gate) => Some(gate),
            Self::Barrier => None,
        }
    }
}

impl From<Gate> for CircuitOp {
    fn from(gate: Gate) -> Self { Self::Gate(gate) }
}

/// An ordered sequence of operations on a fixed register of qubits and
/// classical bits.
///
/// Gates are validated as they are appended, so every circuit in existence
/// only addresses qubits it actually has.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    ops: Vec<CircuitOp>,
}

impl Circuit {
    /// Create a new, empty circuit.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self { num_qubits, num_clbits, ops: Vec::new() }
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.num_qubits }

    /// Return the number of classical bits.
    pub fn num_clbits(&self) -> usize { self.num_clbits }

    /// Return all operations in application order.
    pub fn ops(&self) -> &[CircuitOp] { &self.ops }

    /// Return the number of operations, barriers included.
    pub fn len(&self) -> usize { self.ops.len() }

    /// Return `true` if no operations have been applied.
    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    /// Return an iterator over all gates in application order, skipping
    /// barriers.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> + '_ {
        self.ops.iter().filter_map(CircuitOp::as_gate)
    }

    /// Return the number of gates, not counting barriers.
    pub fn num_gates(&self) -> usize { self.gates().count() }

    fn check_qubit(&self, k: usize) -> CircuitResult<()> {
        (k < self.num_qubits).then_some(())
            .ok_or(QubitOutOfRange(k, self.num_qubits))
    }

    fn check(&self, gate: &Gate) -> CircuitResult<()> {
        let angle = gate.angle();
        if !angle.is_finite() { return Err(NonFiniteAngle(angle)); }
        if gate.is_mcxrot() && gate.controls().is_empty() {
            return Err(NoControls);
        }
        let t = gate.target();
        self.check_qubit(t)?;
        let controls = gate.controls();
        for (i, &c) in controls.iter().enumerate() {
            self.check_qubit(c)?;
            if c == t || controls[..i].contains(&c) {
                return Err(DuplicateQubit(c));
            }
        }
        Ok(())
    }

    /// Apply a [`Gate`].
    ///
    /// Fails if the gate addresses a non-existent qubit, addresses any qubit
    /// twice, or has a non-finite angle. The circuit is unchanged on failure.
    pub fn apply(&mut self, gate: Gate) -> CircuitResult<&mut Self> {
        self.check(&gate)?;
        self.ops.push(gate.into());
        Ok(self)
    }

    /// Apply a rotation about `axis` on qubit `k`.
    pub fn rot(&mut self, axis: Axis, angle: f64, k: usize)
        -> CircuitResult<&mut Self>
    {
        self.apply(Gate::rot(axis, k, angle))
    }

    /// Apply an *x*-rotation on qubit `k`.
    pub fn rx(&mut self, angle: f64, k: usize) -> CircuitResult<&mut Self> {
        self.apply(Gate::XRot(k, angle))
    }

    /// Apply a *y*-rotation on qubit `k`.
    pub fn ry(&mut self, angle: f64, k: usize) -> CircuitResult<&mut Self> {
        self.apply(Gate::YRot(k, angle))
    }

    /// Apply a *z*-rotation on qubit `k`.
    pub fn rz(&mut self, angle: f64, k: usize) -> CircuitResult<&mut Self> {
        self.apply(Gate::ZRot(k, angle))
    }

    /// Apply an *x*-rotation on qubit `t`, controlled by qubit `c`.
    pub fn crx(&mut self, angle: f64, c: usize, t: usize)
        -> CircuitResult<&mut Self>
    {
        self.apply(Gate::CXRot(c, t, angle))
    }

    /// Apply a *y*-rotation on qubit `t`, controlled by qubit `c`.
    pub fn cry(&mut self, angle: f64, c: usize, t: usize)
        -> CircuitResult<&mut Self>
    {
        self.apply(Gate::CYRot(c, t, angle))
    }

    /// Apply an *x*-rotation on qubit `t`, controlled jointly by all
    /// `controls`.
    pub fn mcrx<I>(&mut self, angle: f64, controls: I, t: usize)
        -> CircuitResult<&mut Self>
    where I: IntoIterator<Item = usize>
    {
        self.apply(Gate::mcxrot(controls, t, angle))
    }

    /// Insert a barrier across all qubits.
    pub fn barrier(&mut self) -> &mut Self {
        self.ops.push(CircuitOp::Barrier);
        self
    }

    /// Render `self` as text. See [`DrawStyle`].
    pub fn draw(&self, style: DrawStyle) -> String { draw::render(self, style) }
}

impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.draw(DrawStyle::Unicode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_in_order() {
        let mut circ = Circuit::new(3, 3);
        circ.ry(0.5, 0).unwrap()
            .cry(0.25, 0, 1).unwrap()
            .barrier()
            .mcrx(-0.1, [0, 2], 1).unwrap();
        assert_eq!(circ.len(), 4);
        assert_eq!(circ.num_gates(), 3);
        assert_eq!(circ.num_qubits(), 3);
        assert_eq!(circ.num_clbits(), 3);
        assert_eq!(
            circ.ops(),
            &[
                CircuitOp::Gate(Gate::YRot(0, 0.5)),
                CircuitOp::Gate(Gate::CYRot(0, 1, 0.25)),
                CircuitOp::Barrier,
                CircuitOp::Gate(Gate::MCXRot(vec![0, 2].into(), 1, -0.1)),
            ]
        );
    }

    #[test]
    fn reject_bad_gates() {
        let mut circ = Circuit::new(3, 0);
        assert!(matches!(circ.rx(1.0, 3), Err(QubitOutOfRange(3, 3))));
        assert!(matches!(circ.cry(1.0, 4, 0), Err(QubitOutOfRange(4, 3))));
        assert!(matches!(circ.cry(1.0, 1, 1), Err(DuplicateQubit(1))));
        assert!(matches!(circ.mcrx(1.0, [0, 0], 2), Err(DuplicateQubit(0))));
        assert!(matches!(circ.mcrx(1.0, [0, 2], 2), Err(DuplicateQubit(2))));
        assert!(matches!(circ.mcrx(1.0, Vec::new(), 2), Err(NoControls)));
        assert!(matches!(circ.ry(f64::NAN, 0), Err(NonFiniteAngle(_))));
        assert!(circ.is_empty());
    }

    #[test]
    fn gate_accessors() {
        let g = Gate::mcxrot([2, 0], 1, 0.3);
        assert_eq!(g.axis(), Axis::X);
        assert_eq!(g.target(), 1);
        assert_eq!(g.controls(), &[2, 0]);
        assert_eq!(g.angle(), 0.3);

        let g = Gate::CYRot(0, 2, 1.0);
        assert_eq!(g.axis(), Axis::Y);
        assert_eq!(g.controls(), &[0]);
        assert!(Gate::rot(Axis::Z, 1, 0.2).is_zrot());
    }
}
