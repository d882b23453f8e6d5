use anyhow::{Context, Result};
use clap::{crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use projlet::benchmark::BenchmarkSuite;
use projlet::{EngineConfig, EngineProfile, RasterBuffer, SamplingMode, SourceProjection};
use std::fs;
use std::path::PathBuf;

const DEFAULT_SOURCE_SIZE: u32 = 512;

struct Options {
    config: EngineConfig,
    modes: Vec<SamplingMode>,
    source: SourceProjection,
    tile: String,
    source_size: u32,
    output: Option<PathBuf>,
}

impl Options {
    fn from_args() -> Result<Self> {
        Self::from_matches(Self::get_matches())
    }

    fn get_matches() -> ArgMatches {
        Command::new("projlet-bench")
            .version(crate_version!())
            .about("benchmarks raster reprojection on the CPU")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("engine configuration in JSON")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("profile")
                    .short('p')
                    .long("profile")
                    .value_name("NAME")
                    .value_parser(["balanced", "responsive", "smooth"])
                    .help("preset used when no configuration file is given")
                    .action(ArgAction::Set)
                    .default_value("balanced"),
            )
            .arg(
                Arg::new("size")
                    .short('s')
                    .long("size")
                    .value_name("PIXELS")
                    .value_parser(value_parser!(u32).range(1..))
                    .help("square viewport size to benchmark, repeatable")
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("frames")
                    .short('f')
                    .long("frames")
                    .value_name("COUNT")
                    .value_parser(value_parser!(usize))
                    .help("frames per run")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("mode")
                    .short('m')
                    .long("mode")
                    .value_name("MODE")
                    .value_parser(["baseline", "nearest", "bilinear"])
                    .help("sampling mode to run, repeatable; all by default")
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("source")
                    .long("source")
                    .value_name("PROJECTION")
                    .value_parser(["web-mercator", "equirectangular"])
                    .help("projection of the synthetic source tile")
                    .action(ArgAction::Set)
                    .default_value("web-mercator"),
            )
            .arg(
                Arg::new("tile")
                    .long("tile")
                    .value_name("KIND")
                    .value_parser(["gradient", "checkerboard", "solid"])
                    .help("synthetic source tile")
                    .action(ArgAction::Set)
                    .default_value("gradient"),
            )
            .arg(
                Arg::new("source-size")
                    .long("source-size")
                    .value_name("PIXELS")
                    .value_parser(value_parser!(u32).range(1..))
                    .help("edge length of the source tile")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("write the JSON report here instead of stdout")
                    .action(ArgAction::Set),
            )
            .get_matches()
    }

    fn from_matches(mut matches: ArgMatches) -> Result<Self> {
        let mut config = match matches.remove_one::<PathBuf>("config") {
            Some(path) => EngineConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => {
                let profile = match matches.remove_one::<String>("profile").as_deref() {
                    Some("responsive") => EngineProfile::Responsive,
                    Some("smooth") => EngineProfile::Smooth,
                    _ => EngineProfile::Balanced,
                };
                profile.resolve()
            }
        };

        if let Some(sizes) = matches.remove_many::<u32>("size") {
            config.benchmark.viewport_sizes = sizes.collect();
        }
        if let Some(frames) = matches.remove_one::<usize>("frames") {
            config.benchmark.frame_count = frames;
        }

        let modes = match matches.remove_many::<String>("mode") {
            Some(names) => names
                .map(|name| name.parse::<SamplingMode>())
                .collect::<Result<Vec<_>, _>>()?,
            None => SamplingMode::ALL.to_vec(),
        };
        let source = match matches.remove_one::<String>("source").as_deref() {
            Some("equirectangular") => SourceProjection::Equirectangular,
            _ => SourceProjection::WebMercator,
        };

        Ok(Options {
            config,
            modes,
            source,
            tile: matches
                .remove_one::<String>("tile")
                .unwrap_or_else(|| "gradient".to_string()),
            source_size: matches
                .remove_one::<u32>("source-size")
                .unwrap_or(DEFAULT_SOURCE_SIZE),
            output: matches.remove_one("output"),
        })
    }

    fn source_tile(&self) -> RasterBuffer {
        let size = self.source_size;
        match self.tile.as_str() {
            "checkerboard" => RasterBuffer::checkerboard(
                size,
                size,
                (size / 16).max(1),
                [30, 30, 30, 255],
                [230, 230, 230, 255],
            ),
            "solid" => RasterBuffer::solid(size, size, [255, 0, 0, 255]),
            _ => RasterBuffer::gradient(size, size),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let options = Options::from_args()?;
    log::info!(
        "benchmarking {} mode(s) at sizes {:?}, {} frames each",
        options.modes.len(),
        options.config.benchmark.viewport_sizes,
        options.config.benchmark.frame_count
    );

    let suite = BenchmarkSuite::new(
        options.config.benchmark.clone(),
        options.source_tile(),
        options.source,
    )
    .with_modes(options.modes.clone());
    let report = suite.run();
    let json = report.to_json()?;

    match &options.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => println!("{}", json),
    }

    if !report.all_pass() {
        log::warn!(
            "at least one run stayed below {} fps",
            options.config.benchmark.target_fps
        );
    }
    Ok(())
}
