//! Gate sequences for a single time step of the neuron.
//!
//! Each function here appends to a caller-owned [`Circuit`] and never reads
//! back from it. Rotation angles stand in for `dt × (derivative
//! contribution)` in a first-order discretization of the three-variable
//! system
//! ```text
//! ẋ = -x
//! ẏ = -y - x z
//! ż = -z + x y
//! ```
//! driven by the control template and coupled through the feedback template.
//!
//! Qubits are addressed relative to [`LayerParams::first_qubit_index`], except
//! by [`encode_inputs`], which always targets qubits `0..k`.

use tracing::trace;
use crate::circuit::{ Circuit, CircuitError };
use super::{ LayerParams, Mode, NeuronError, NeuronResult, Template, NUM_AXES };

// every input must be a valid cosine
fn check_domain(inputs: &[f64]) -> NeuronResult<()> {
    match inputs.iter().enumerate()
        .find(|(_, v)| !(-1.0..=1.0).contains(*v))
    {
        Some((index, &value)) => Err(NeuronError::Domain { index, value }),
        None => Ok(()),
    }
}

// the whole three-qubit span must fit before anything is appended
fn check_span(circuit: &Circuit, first: usize) -> NeuronResult<()> {
    let last = first.checked_add(NUM_AXES - 1)
        .ok_or(CircuitError::QubitOutOfRange(first, circuit.num_qubits()))?;
    if last >= circuit.num_qubits() {
        return Err(
            CircuitError::QubitOutOfRange(last, circuit.num_qubits()).into()
        );
    }
    Ok(())
}

fn check_normalized(inputs: &[f64]) -> NeuronResult<()> {
    if inputs.len() < NUM_AXES {
        return Err(NeuronError::InputLength {
            expected: NUM_AXES,
            got: inputs.len(),
        });
    }
    Ok(())
}

/// Encode each input `v` as a *y*-rotation by `arccos(v)` on the qubit with
/// the same index, so that `⟨Z⟩ = v` on the freshly prepared state.
///
/// All inputs are checked before any gate is appended.
pub fn encode_inputs(circuit: &mut Circuit, inputs: &[f64])
    -> NeuronResult<()>
{
    check_domain(inputs)?;
    if inputs.len() > circuit.num_qubits() {
        return Err(NeuronError::InputLength {
            expected: circuit.num_qubits(),
            got: inputs.len(),
        });
    }
    for (k, v) in inputs.iter().enumerate() {
        circuit.ry(v.acos(), k)?;
    }
    trace!(inputs = ?inputs, "encoded inputs");
    Ok(())
}

/// Append the templated part of one layer.
///
/// In order:
/// 1. an *x*-rotation on each qubit `i` by `dt·d/3 · Σⱼ control[i][j]·inputs[j]`;
/// 1. a barrier;
/// 1. for each qubit `i`, *y*-rotations controlled by `i` onto every other
///    qubit `j` by `dt·d · feedback[i][j]`, followed by a *y*-rotation on `i`
///    itself by `dt·d · feedback[i][i]`;
/// 1. a barrier;
/// 1. in [`Mode::NonHybrid`] only, the nonlinear cross terms: an *x*-rotation
///    by `-dt` on qubit 1 controlled by qubits 0 and 2, and one by `+dt` on
///    qubit 2 controlled by qubits 0 and 1, followed by a barrier.
///
/// `d` is the damping factor `1 - dt` or 1; see [`LayerParams::damping`].
pub fn apply_layer(
    circuit: &mut Circuit,
    inputs: &[f64],
    control: &Template,
    feedback: &Template,
    mode: Mode,
    params: &LayerParams,
) -> NeuronResult<()>
{
    check_normalized(inputs)?;
    let first = params.first_qubit_index;
    check_span(circuit, first)?;
    let dt = params.dt;
    let damp = params.damp_factor(mode);

    for i in 0..NUM_AXES {
        let drive: f64 =
            (0..NUM_AXES).map(|j| control[(i, j)] * inputs[j]).sum();
        circuit.rx(dt * drive / 3.0 * damp, first + i)?;
    }
    circuit.barrier();

    for i in 0..NUM_AXES {
        for j in (0..NUM_AXES).filter(|j| *j != i) {
            circuit.cry(dt * feedback[(i, j)] * damp, first + i, first + j)?;
        }
        circuit.ry(dt * feedback[(i, i)] * damp, first + i)?;
    }
    circuit.barrier();

    match mode {
        Mode::NonHybrid => {
            // ẏ ∋ -x z
            circuit.mcrx(-dt, [first, first + 2], first + 1)?;
            // ż ∋ x y
            circuit.mcrx(dt, [first, first + 1], first + 2)?;
            circuit.barrier();
        },
        Mode::Hybrid => { },
    }
    trace!(?mode, dt, damp, first, "applied templated layer");
    Ok(())
}

/// Append the self-decay stage for classical state `(x, y, z)`: *y*-rotations
/// by `-x·dt`, `(-y - x·z)·dt`, and `(-z + x·y)·dt` on the three qubits,
/// followed by a barrier.
pub fn apply_self_decay(
    circuit: &mut Circuit,
    state: [f64; NUM_AXES],
    params: &LayerParams,
) -> NeuronResult<()>
{
    let first = params.first_qubit_index;
    check_span(circuit, first)?;
    let dt = params.dt;
    let [x, y, z] = state;
    circuit.ry(-x * dt, first)?
        .ry((-y - x * z) * dt, first + 1)?
        .ry((-z + x * y) * dt, first + 2)?
        .barrier();
    trace!(?state, dt, "applied self-decay");
    Ok(())
}

/// Append a full hybrid layer: the templated layer in [`Mode::Hybrid`]
/// followed by the self-decay stage for `state`.
pub fn apply_hybrid_layer(
    circuit: &mut Circuit,
    inputs: &[f64],
    control: &Template,
    feedback: &Template,
    state: [f64; NUM_AXES],
    params: &LayerParams,
) -> NeuronResult<()>
{
    apply_layer(circuit, inputs, control, feedback, Mode::Hybrid, params)?;
    apply_self_decay(circuit, state, params)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{ FRAC_PI_2, PI };
    use crate::circuit::{ CircuitOp, Gate };
    use super::*;

    const EPSILON: f64 = 1e-15;

    fn angles(circuit: &Circuit) -> Vec<f64> {
        circuit.gates().map(Gate::angle).collect()
    }

    fn template(f: impl Fn(usize, usize) -> f64) -> Template {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, x) in row.iter_mut().enumerate() { *x = f(i, j); }
        }
        Template::from_rows(rows)
    }

    #[test]
    fn encode() {
        let mut circ = Circuit::new(3, 3);
        encode_inputs(&mut circ, &[1.0, 0.0, -1.0]).unwrap();
        let expected = [0.0, FRAC_PI_2, PI];
        for (k, (gate, ang)) in circ.gates().zip(expected).enumerate() {
            assert!(gate.is_yrot());
            assert_eq!(gate.target(), k);
            assert!((gate.angle() - ang).abs() < EPSILON);
        }
    }

    #[test]
    fn encode_rejects_domain() {
        let mut circ = Circuit::new(3, 0);
        assert!(matches!(
            encode_inputs(&mut circ, &[0.5, 1.5, 0.0]),
            Err(NeuronError::Domain { index: 1, .. }),
        ));
        assert!(matches!(
            encode_inputs(&mut circ, &[f64::NAN]),
            Err(NeuronError::Domain { index: 0, .. }),
        ));
        assert!(circ.is_empty());
        assert!(matches!(
            encode_inputs(&mut circ, &[0.0; 4]),
            Err(NeuronError::InputLength { expected: 3, got: 4 }),
        ));
    }

    #[test]
    fn non_hybrid_sequence() {
        let dt = 0.1;
        let params = LayerParams::default().with_dt(dt).with_first_qubit_index(1);
        let control = template(|i, j| (i * 3 + j) as f64);
        let feedback = template(|i, j| 1.0 + (i * 3 + j) as f64);
        let inputs = [0.5, -0.25, 1.0];
        let mut circ = Circuit::new(4, 0);
        apply_layer(
            &mut circ, &inputs, &control, &feedback, Mode::NonHybrid, &params,
        ).unwrap();

        let d = 1.0 - dt;
        let ops = circ.ops();
        assert_eq!(ops.len(), 3 + 1 + 9 + 1 + 2 + 1);
        assert_eq!(ops.iter().filter(|op| op.is_barrier()).count(), 3);
        assert!(ops[3].is_barrier() && ops[13].is_barrier() && ops[16].is_barrier());

        for i in 0..3 {
            let drive: f64 =
                (0..3).map(|j| control[(i, j)] * inputs[j]).sum();
            let g = ops[i].as_gate().unwrap();
            assert!(g.is_xrot());
            assert_eq!(g.target(), 1 + i);
            assert!((g.angle() - dt * drive / 3.0 * d).abs() < EPSILON);
        }

        let coupling: Vec<&Gate> =
            ops[4..13].iter().filter_map(CircuitOp::as_gate).collect();
        let mut k = 0;
        for i in 0..3 {
            for j in (0..3).filter(|j| *j != i) {
                assert_eq!(coupling[k], &Gate::CYRot(1 + i, 1 + j,
                    dt * feedback[(i, j)] * d));
                k += 1;
            }
            assert_eq!(coupling[k], &Gate::YRot(1 + i, dt * feedback[(i, i)] * d));
            k += 1;
        }

        assert_eq!(ops[14], CircuitOp::Gate(Gate::mcxrot([1, 3], 2, -dt)));
        assert_eq!(ops[15], CircuitOp::Gate(Gate::mcxrot([1, 2], 3, dt)));
    }

    #[test]
    fn hybrid_has_no_damping_or_cross_terms() {
        let dt = 0.2;
        let params = LayerParams::default().with_dt(dt);
        let control = Template::identity();
        let feedback = template(|_, _| 1.0);
        let mut circ = Circuit::new(3, 0);
        apply_hybrid_layer(
            &mut circ, &[0.3, 0.6, 0.9], &control, &feedback,
            [0.5, -0.5, 0.25], &params,
        ).unwrap();
        assert!(circ.gates().all(|g| !g.is_mcxrot()));
        let ang = angles(&circ);
        assert_eq!(ang.len(), 3 + 9 + 3);
        assert!((ang[0] - dt * 0.3 / 3.0).abs() < EPSILON);
        assert!((ang[3] - dt).abs() < EPSILON);
        assert_eq!(circ.ops().iter().filter(|op| op.is_barrier()).count(), 3);
    }

    #[test]
    fn damping_override() {
        let dt = 0.5;
        let control = Template::identity();
        let feedback = Template::zeros();

        let params = LayerParams::default().with_dt(dt).with_damping(false);
        let mut circ = Circuit::new(3, 0);
        apply_layer(
            &mut circ, &[1.0, 1.0, 1.0], &control, &feedback,
            Mode::NonHybrid, &params,
        ).unwrap();
        assert!((angles(&circ)[0] - dt / 3.0).abs() < EPSILON);

        let params = LayerParams::default().with_dt(dt).with_damping(true);
        let mut circ = Circuit::new(3, 0);
        apply_layer(
            &mut circ, &[1.0, 1.0, 1.0], &control, &feedback,
            Mode::Hybrid, &params,
        ).unwrap();
        assert!((angles(&circ)[0] - dt / 3.0 * (1.0 - dt)).abs() < EPSILON);
    }

    #[test]
    fn self_decay_angles() {
        let dt = 0.05;
        let (x, y, z) = (0.7, -0.2, 0.4);
        let mut circ = Circuit::new(3, 0);
        apply_self_decay(&mut circ, [x, y, z], &LayerParams::default().with_dt(dt))
            .unwrap();
        assert_eq!(
            circ.ops(),
            &[
                CircuitOp::Gate(Gate::YRot(0, -x * dt)),
                CircuitOp::Gate(Gate::YRot(1, (-y - x * z) * dt)),
                CircuitOp::Gate(Gate::YRot(2, (-z + x * y) * dt)),
                CircuitOp::Barrier,
            ]
        );
    }

    #[test]
    fn zero_dt_gives_zero_angles() {
        let params = LayerParams::default().with_dt(0.0);
        let control = template(|i, j| 1.0 + (i + j) as f64);
        let feedback = template(|i, j| 2.0 - (i * j) as f64);
        let mut circ = Circuit::new(3, 0);
        for _ in 0..4 {
            apply_layer(
                &mut circ, &[0.9, -0.4, 0.1], &control, &feedback,
                Mode::NonHybrid, &params,
            ).unwrap();
        }
        assert!(angles(&circ).iter().all(|a| *a == 0.0));
    }

    #[test]
    fn span_and_length_checks() {
        let params = LayerParams::default().with_first_qubit_index(1);
        let t = Template::identity();
        let mut circ = Circuit::new(3, 0);
        assert!(matches!(
            apply_layer(&mut circ, &[0.0; 3], &t, &t, Mode::NonHybrid, &params),
            Err(NeuronError::Circuit(CircuitError::QubitOutOfRange(3, 3))),
        ));
        assert!(matches!(
            apply_layer(&mut circ, &[0.0; 2], &t, &t, Mode::NonHybrid,
                &LayerParams::default()),
            Err(NeuronError::InputLength { expected: 3, got: 2 }),
        ));
        assert!(matches!(
            apply_self_decay(&mut circ, [0.0; 3], &params),
            Err(NeuronError::Circuit(CircuitError::QubitOutOfRange(3, 3))),
        ));
        assert!(circ.is_empty());
    }

    #[test]
    fn span_overflow_is_out_of_range() {
        let params = LayerParams::default().with_first_qubit_index(usize::MAX);
        let t = Template::identity();
        let mut circ = Circuit::new(3, 0);
        assert!(matches!(
            apply_layer(&mut circ, &[0.0; 3], &t, &t, Mode::NonHybrid, &params),
            Err(NeuronError::Circuit(
                CircuitError::QubitOutOfRange(usize::MAX, 3))),
        ));
        assert!(matches!(
            apply_self_decay(&mut circ, [0.0; 3], &params),
            Err(NeuronError::Circuit(
                CircuitError::QubitOutOfRange(usize::MAX, 3))),
        ));
        let params = params.with_first_qubit_index(usize::MAX - 1);
        assert!(matches!(
            apply_hybrid_layer(
                &mut circ, &[0.0; 3], &t, &t, [0.0; 3], &params),
            Err(NeuronError::Circuit(
                CircuitError::QubitOutOfRange(m, 3))) if m == usize::MAX - 1,
        ));
        assert!(circ.is_empty());
    }

    #[test]
    fn hybrid_layer_with_offset() {
        let dt = 0.1;
        let first = 2;
        let params =
            LayerParams::default().with_dt(dt).with_first_qubit_index(first);
        let control = template(|i, j| 0.5 + (i + 2 * j) as f64);
        let feedback = template(|i, j| 1.0 - (i * 3 + j) as f64 / 4.0);
        let inputs = [0.25, -0.5, 0.75];
        let (x, y, z) = (0.6, -0.3, 0.2);
        let mut circ = Circuit::new(5, 0);
        encode_inputs(&mut circ, &inputs).unwrap();
        apply_hybrid_layer(
            &mut circ, &inputs, &control, &feedback, [x, y, z], &params,
        ).unwrap();

        let ops = circ.ops();
        assert_eq!(ops.len(), 3 + 3 + 1 + 9 + 1 + 3 + 1);
        for k in 0..3 {
            assert_eq!(ops[k], CircuitOp::Gate(Gate::YRot(k, inputs[k].acos())));
        }

        for i in 0..3 {
            let drive: f64 =
                (0..3).map(|j| control[(i, j)] * inputs[j]).sum();
            assert_eq!(
                ops[3 + i],
                CircuitOp::Gate(Gate::XRot(first + i, dt * drive / 3.0)),
            );
        }
        assert!(ops[6].is_barrier());

        let mut k = 7;
        for i in 0..3 {
            for j in (0..3).filter(|j| *j != i) {
                assert_eq!(
                    ops[k],
                    CircuitOp::Gate(Gate::CYRot(
                        first + i, first + j, dt * feedback[(i, j)])),
                );
                k += 1;
            }
            assert_eq!(
                ops[k],
                CircuitOp::Gate(Gate::YRot(first + i, dt * feedback[(i, i)])),
            );
            k += 1;
        }
        assert!(ops[16].is_barrier());

        assert_eq!(
            &ops[17..],
            &[
                CircuitOp::Gate(Gate::YRot(first, -x * dt)),
                CircuitOp::Gate(Gate::YRot(first + 1, (-y - x * z) * dt)),
                CircuitOp::Gate(Gate::YRot(first + 2, (-z + x * y) * dt)),
                CircuitOp::Barrier,
            ]
        );
        assert!(circ.gates().all(|g| g.target() < 5 && !g.is_mcxrot()));
    }
}
