use clap::Parser;
use rmap::io::{load_fingerprints, save_map, DEFAULT_CONNECTIVITY_NAME, DEFAULT_OUTPUT_NAME};
use rmap::{
    compute_rmap, count_degenerate, flatten_volumes_with_dims, sanitize, FilterMode,
    FingerprintFilter, Method, NanPolicy, RmapConfig, Volume, VolumeDims,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "R-map estimation (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FilterModeConfig {
    Keep,
    Omit,
}

impl From<FilterModeConfig> for FilterMode {
    fn from(value: FilterModeConfig) -> Self {
        match value {
            FilterModeConfig::Keep => FilterMode::Keep,
            FilterModeConfig::Omit => FilterMode::Omit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FilterJson {
    mode: FilterModeConfig,
    include: Option<String>,
    exclude: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MethodConfig {
    Formula,
    Reference,
}

impl From<MethodConfig> for Method {
    fn from(value: MethodConfig) -> Self {
        match value {
            MethodConfig::Formula => Method::Formula,
            MethodConfig::Reference => Method::Reference,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NanPolicyConfig {
    Keep,
    Zero,
    Fill,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    fingerprint_dir: String,
    connectivity_name: String,
    filter: Option<FilterJson>,
    correlates: Option<Vec<f64>>,
    correlates_path: Option<String>,
    method: MethodConfig,
    parallel: bool,
    nan_policy: NanPolicyConfig,
    nan_fill: Option<f64>,
    volume_dims: [usize; 3],
    output_path: String,
}

impl Default for Config {
    fn default() -> Self {
        let dims = VolumeDims::default();
        Self {
            fingerprint_dir: String::new(),
            connectivity_name: DEFAULT_CONNECTIVITY_NAME.to_string(),
            filter: None,
            correlates: None,
            correlates_path: None,
            method: MethodConfig::Formula,
            parallel: true,
            nan_policy: NanPolicyConfig::Zero,
            nan_fill: None,
            volume_dims: dims.as_array(),
            output_path: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

impl Config {
    fn fingerprint_filter(&self) -> Result<FingerprintFilter, Box<dyn std::error::Error>> {
        let filter = self
            .filter
            .as_ref()
            .ok_or("filter must be set in the config")?;
        Ok(FingerprintFilter::from_mode(
            filter.mode.into(),
            &self.connectivity_name,
            filter.include.as_deref(),
            filter.exclude.as_deref(),
        )?)
    }

    fn nan_policy(&self) -> Result<NanPolicy, Box<dyn std::error::Error>> {
        Ok(match self.nan_policy {
            NanPolicyConfig::Keep => NanPolicy::Keep,
            NanPolicyConfig::Zero => NanPolicy::Zero,
            NanPolicyConfig::Fill => NanPolicy::Fill(
                self.nan_fill
                    .ok_or("nan_fill must be set when nan_policy is fill")?,
            ),
        })
    }

    fn correlates(&self) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
        if let Some(values) = &self.correlates {
            return Ok(values.clone());
        }
        let path = self
            .correlates_path
            .as_ref()
            .ok_or("either correlates or correlates_path must be set")?;
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, Serialize)]
struct Output {
    fingerprints: Vec<String>,
    voxels: usize,
    samples: usize,
    degenerate_voxels: usize,
    output_path: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("rmap=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.fingerprint_dir.is_empty() {
        return Err("fingerprint_dir must be set in the config".into());
    }
    let [nx, ny, nz] = config.volume_dims;
    let dims = VolumeDims::new(nx, ny, nz);
    dims.validate()?;
    let filter = config.fingerprint_filter()?;
    let nan_policy = config.nan_policy()?;
    let correlates = config.correlates()?;

    let fingerprints = load_fingerprints(&config.fingerprint_dir, &filter)?;
    if fingerprints.len() != correlates.len() {
        return Err(format!(
            "{} fingerprints selected but {} correlates given",
            fingerprints.len(),
            correlates.len()
        )
        .into());
    }
    // The first fingerprint's transform positions the output map.
    let affine = fingerprints.first().and_then(|f| f.affine);
    let names: Vec<String> = fingerprints.iter().map(|f| f.name.clone()).collect();
    let volumes: Vec<Volume> = fingerprints.into_iter().map(|f| f.volume).collect();
    // The map is reshaped with the configured dims, so the loaded volumes must
    // have exactly that shape, not just the same voxel count.
    let matrix = flatten_volumes_with_dims(&volumes, dims)?;
    drop(volumes);

    let cfg = RmapConfig {
        method: config.method.into(),
        parallel: config.parallel,
    };
    let mut map = compute_rmap(matrix.view(), &correlates, &cfg)?;
    let degenerate_voxels = count_degenerate(&map);
    sanitize(&mut map, nan_policy);

    save_map(&config.output_path, &map, dims, affine.as_ref())?;

    let output = Output {
        fingerprints: names,
        voxels: matrix.voxels(),
        samples: matrix.samples(),
        degenerate_voxels,
        output_path: config.output_path.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
