use clap::Parser;
use plume_sim_core::{
    calculate_concentration, calculate_grid_with_pattern, ParamValue, Parameters, SamplingPattern,
};
use plume_sim_core::grid::{DEFAULT_DISTANCES, DEFAULT_OFFSETS};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gaussian dispersion calculator
///
/// Examples:
///   plume-demo --model plume --param x=500 --param stability_class=D
///   plume-demo --model puff --param Q=250 --param t=120 --grid
#[derive(Parser, Debug)]
#[command(name = "plume-demo")]
#[command(about = "Gaussian plume/puff dispersion demo", long_about = None)]
struct Args {
    /// Release kinetics: plume, puff or instantaneous
    #[arg(short, long, default_value = "plume")]
    model: String,

    /// Parameter as key=value (repeatable), e.g. x=500, Q=10, wind_speed=8, stability_class=D
    #[arg(short, long = "param", value_parser = parse_key_value)]
    params: Vec<(String, ParamValue)>,

    /// Evaluate a receptor grid instead of a single point
    #[arg(short, long)]
    grid: bool,

    /// Grid downwind distances in meters (comma-separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    distances: Option<Vec<f64>>,

    /// Grid crosswind offsets in meters (comma-separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    offsets: Option<Vec<f64>>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

/// Split `key=value`; values that parse as numbers are passed as numbers.
fn parse_key_value(raw: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = value.trim();
    let value = match value.parse::<f64>() {
        Ok(n) => ParamValue::Number(n),
        Err(_) => ParamValue::Text(value.to_string()),
    };
    Ok((key.to_string(), value))
}

fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let params: Parameters = args.params.into_iter().collect();

    let value = if args.grid {
        let distances = args.distances.unwrap_or_else(|| DEFAULT_DISTANCES.to_vec());
        let offsets = args.offsets.unwrap_or_else(|| DEFAULT_OFFSETS.to_vec());
        let pattern = SamplingPattern::from_meters(&distances, &offsets);
        serde_json::to_value(calculate_grid_with_pattern(&args.model, &params, &pattern)?)?
    } else {
        serde_json::to_value(calculate_concentration(&args.model, &params)?)?
    };

    let text = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_pairs() {
        assert_eq!(
            parse_key_value("x=500").unwrap(),
            ("x".to_string(), ParamValue::Number(500.0))
        );
        assert_eq!(
            parse_key_value("stability_class = D").unwrap(),
            ("stability_class".to_string(), ParamValue::Text("D".into()))
        );
        assert!(parse_key_value("x").is_err());
        assert!(parse_key_value("=5").is_err());
    }

    #[test]
    fn single_point_json() {
        let args = Args::parse_from(["plume-demo", "--model", "plume", "-p", "x=300", "-p", "stability=4"]);
        let json: serde_json::Value = serde_json::from_str(&run(args).unwrap()).unwrap();
        assert_eq!(json["model_type"], "plume");
        assert_eq!(json["stability_class"], "D");
        assert_eq!(json["units"], "µg/m³");
    }

    #[test]
    fn grid_with_custom_pattern() {
        let args = Args::parse_from([
            "plume-demo",
            "--model",
            "instant",
            "--grid",
            "--distances",
            "100,200",
            "--offsets",
            "-10,0,10",
        ]);
        let json: serde_json::Value = serde_json::from_str(&run(args).unwrap()).unwrap();
        assert_eq!(json["samples"].as_array().unwrap().len(), 6);
        assert_eq!(json["model_type"], "instantaneous");
    }

    #[test]
    fn bad_model_is_an_error() {
        let args = Args::parse_from(["plume-demo", "--model", "jet"]);
        assert!(run(args).is_err());
    }
}
