//! Plain-text circuit diagrams.
//!
//! Each qubit gets one horizontal wire and each operation gets one column.
//! Diagrams are for inspection only and carry no information beyond what
//! [`Circuit::ops`] already provides.

use itertools::Itertools;
use super::{ Axis, Circuit, CircuitOp, Gate };

/// Character set used to draw a circuit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DrawStyle {
    /// Plain ASCII only.
    Ascii,
    /// Box-drawing characters.
    #[default]
    Unicode,
}

struct Glyphs {
    wire: char,
    clwire: char,
    control: &'static str,
    link: &'static str,
    barrier: &'static str,
}

impl DrawStyle {
    fn glyphs(self) -> Glyphs {
        match self {
            Self::Ascii => Glyphs {
                wire: '-',
                clwire: '=',
                control: "*",
                link: "|",
                barrier: "#",
            },
            Self::Unicode => Glyphs {
                wire: '─',
                clwire: '═',
                control: "■",
                link: "┼",
                barrier: "░",
            },
        }
    }
}

fn gate_label(gate: &Gate) -> String {
    let ax = match gate.axis() {
        Axis::X => "RX",
        Axis::Y => "RY",
        Axis::Z => "RZ",
    };
    format!("{}({:.3})", ax, gate.angle())
}

// cell contents for every wire in a single column
fn column(op: &CircuitOp, n: usize, glyphs: &Glyphs) -> Vec<Option<String>> {
    let mut cells: Vec<Option<String>> = vec![None; n];
    match op {
        CircuitOp::Barrier => {
            cells.iter_mut()
                .for_each(|cell| { *cell = Some(glyphs.barrier.to_string()); });
        },
        CircuitOp::Gate(gate) => {
            let t = gate.target();
            let controls = gate.controls();
            let lo = controls.iter().copied().chain([t]).min().unwrap_or(t);
            let hi = controls.iter().copied().chain([t]).max().unwrap_or(t);
            for k in lo..=hi {
                cells[k] = Some(glyphs.link.to_string());
            }
            for &c in controls.iter() {
                cells[c] = Some(glyphs.control.to_string());
            }
            cells[t] = Some(gate_label(gate));
        },
    }
    cells
}

fn pad(cell: Option<&str>, width: usize, fill: char) -> String {
    let cell = cell.unwrap_or("");
    let len = cell.chars().count();
    let left = (width - len) / 2;
    let right = width - len - left;
    let mut out = String::with_capacity(width + 2);
    (0..=left).for_each(|_| out.push(fill));
    out.push_str(cell);
    (0..=right).for_each(|_| out.push(fill));
    out
}

pub(crate) fn render(circuit: &Circuit, style: DrawStyle) -> String {
    let glyphs = style.glyphs();
    let n = circuit.num_qubits();
    let columns: Vec<Vec<Option<String>>> =
        circuit.ops().iter()
        .map(|op| column(op, n, &glyphs))
        .collect();
    let widths: Vec<usize> =
        columns.iter()
        .map(|col| {
            col.iter()
                .flatten()
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let name_width = format!("q{}", n.saturating_sub(1)).len();
    let mut lines: Vec<String> =
        (0..n)
        .map(|k| {
            let body: String =
                columns.iter().zip(&widths)
                .map(|(col, w)| pad(col[k].as_deref(), *w, glyphs.wire))
                .collect();
            format!("{:>w$}: {}{}", format!("q{}", k), body, glyphs.wire,
                w = name_width)
        })
        .collect();
    if circuit.num_clbits() > 0 {
        let len: usize = widths.iter().map(|w| w + 2).sum::<usize>() + 1;
        let body: String = std::iter::repeat(glyphs.clwire).take(len).collect();
        lines.push(
            format!("{:>w$}: {}/{}", "c", circuit.num_clbits(), body,
                w = name_width)
        );
    }
    lines.into_iter().join("\n")
}
