use qcel_neuron::{
    circuit::DrawStyle,
    estimator::StatevectorEstimator,
    neuron::{ Evolution, LayerParams, Mode, Neuron, Template },
};
use tracing_subscriber::EnvFilter;

fn print_evolution(evolution: &Evolution) {
    for (label, series) in evolution.iter() {
        let values: Vec<String> =
            series.iter().map(|v| format!("{:+.4}", v)).collect();
        println!("  ⟨Z_{}⟩ = [{}]", label, values.join(", "));
    }
}

// run both modes on a neuron driven by an identity control template and a
// weak cyclic feedback coupling
//
//   x --> y --> z --> x
//
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let inputs = [0.8, 0.1, -0.4];
    let control = Template::identity();
    let feedback = Template::from_rows([
        [0.5, 1.0, 0.0],
        [0.0, 0.5, 1.0],
        [1.0, 0.0, 0.5],
    ]);
    let params = LayerParams::default().with_dt(0.05);
    const LAYERS: usize = 8;

    for mode in [Mode::NonHybrid, Mode::Hybrid] {
        let mut neuron = Neuron::new(3, 3, StatevectorEstimator::new());
        let evolution = neuron.evaluate_observable_evolution(
            &inputs, &inputs, &control, &feedback, LAYERS, mode, &params,
        )?;
        println!("mode = {mode}, {} layers", evolution.len());
        print_evolution(&evolution);
        if mode == Mode::NonHybrid {
            println!("{}", neuron.draw(DrawStyle::Ascii));
        }
    }
    Ok(())
}
