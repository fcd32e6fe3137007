//! Computes the witness of a std circuit.
//! Arguments:
//! - field: field identifier
//! - circuit: template name, see `catalog::CIRCUIT_NAMES`
//! - param: template parameter (bit width, matrix size or constant)
//! - input: circom-style input json; a random valid assignment when absent

use std::{fs, io::BufWriter, process};

use circuit_std_rs::catalog::build_by_name;
use clap::{Parser, ValueEnum};
use rand::thread_rng;
use witness_calc::frontend::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Wtns,
    Json,
}

/// Arguments for the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Field Identifier: bn254, m31
    #[arg(short, long, default_value_t = String::from("bn254"))]
    field: String,

    #[arg(short, long)]
    circuit: String,

    #[arg(short, long)]
    param: Option<String>,

    #[arg(short, long)]
    input: Option<String>,

    #[arg(short, long, default_value_t = String::from("witness.wtns"))]
    output: String,

    #[arg(long, value_enum, default_value_t = Format::Wtns)]
    format: Format,

    /// Also write the circuit layout as json
    #[arg(long)]
    dump_layout: Option<String>,

    /// Keep subcomponent bookkeeping until the end of the run
    #[arg(long)]
    keep_subcomponents: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    print_info(&args);

    let res = match args.field.as_str() {
        "bn254" => run::<BN254>(&args),
        "m31" => run::<M31>(&args),
        _ => Err(Error::UserError(format!("unsupported field {}", args.field))),
    };
    if let Err(e) = res {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run<F: Field>(args: &Args) -> Result<(), Error> {
    let mut rng = thread_rng();
    let circuit = build_by_name::<F>(&args.circuit, args.param.as_deref(), &mut rng)?;
    if let Some(path) = &args.dump_layout {
        fs::write(path, circuit.layout.to_json()?)?;
    }
    let inputs = match &args.input {
        Some(path) => InputSignals::from_json(&fs::read_to_string(path)?)?,
        None => circuit.sample,
    };

    let calc = WitnessCalculator::new(circuit.layout, circuit.registry)?.with_options(
        CalcOptions {
            release_subcomponents: !args.keep_subcomponents,
        },
    );
    let witness = calc.calculate_witness(&inputs)?;
    match args.format {
        Format::Wtns => {
            let file = fs::File::create(&args.output)?;
            witness.serialize_into(BufWriter::new(file))?;
        }
        Format::Json => fs::write(&args.output, witness.to_json()?)?,
    }
    println!("{} witness values written to {}", witness.len(), args.output);
    Ok(())
}

fn print_info(args: &Args) {
    println!("===============================");
    println!("Circuit:   {}", args.circuit);
    println!("Parameter: {}", args.param.as_deref().unwrap_or("default"));
    println!("Field:     {}", args.field);
    println!("===============================")
}
