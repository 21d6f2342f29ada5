use anyhow::{Context, Result, bail};
use clap::Parser;
use geo::{Coord, coord};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

use polyroute::config::{FileConfig, resolve_verbose};
use polyroute::export::write_scene;
use polyroute::{
    Deflection, Domain, PolygonField, Role, Route, Selection, SelectionState, defaults, plan,
};

/// Generate random non-overlapping polygons and route between two free points
///
/// Examples:
///   # Five polygons, random start and goal
///   polyroute
///
///   # Reproducible arena with explicit endpoints
///   polyroute -n 8 --seed 42 --start 0.2,0.2 --goal 9.8,9.8
///
///   # Larger arena, write the scene for a renderer
///   polyroute -n 20 --domain-size 30 -o scene.json
///
///   # Use a config file
///   polyroute --config my-arena.toml
#[derive(Parser, Debug)]
#[command(name = "polyroute")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches polyroute.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of polygons to generate
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Side length of the square arena (lower-left corner from config, default origin)
    #[arg(long)]
    domain_size: Option<f64>,

    /// RNG seed for a reproducible arena
    #[arg(long)]
    seed: Option<u64>,

    /// Candidate polygons tried per sampling round
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Start point as X,Y (random free point if omitted)
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    start: Option<Coord<f64>>,

    /// Goal point as X,Y (random free point if omitted)
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    goal: Option<Coord<f64>>,

    /// Write the polygons and route as JSON
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let (file_config, config_warnings) = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        (Some(FileConfig::from_path(config_path)?), Vec::new())
    } else {
        FileConfig::load()
    };

    let verbose = resolve_verbose(args.verbose, file_config.as_ref());
    init_logging(verbose);
    for warning in &config_warnings {
        log::warn!("{}", warning);
    }

    let count = args
        .count
        .or_else(|| file_config.as_ref().map(|c| c.count))
        .unwrap_or(defaults::POLYGON_COUNT);
    if count == 0 {
        bail!("Please enter a valid number of polygons (a positive integer)");
    }

    let seed = args
        .seed
        .or_else(|| file_config.as_ref().and_then(|c| c.seed));

    let domain = file_config
        .as_ref()
        .and_then(|c| c.domain.clone())
        .unwrap_or_default()
        .to_domain()
        .context("Invalid domain in config file")?;
    let domain = match args.domain_size {
        Some(size) => {
            Domain::new(domain.min_x, domain.min_y, size).context("Invalid --domain-size")?
        }
        None => domain,
    };

    let mut generator = file_config
        .as_ref()
        .and_then(|c| c.generation.clone())
        .unwrap_or_default()
        .to_generator_config(seed);
    if let Some(max_attempts) = args.max_attempts {
        generator.max_attempts = max_attempts;
    }

    let start = args.start.or_else(|| {
        file_config
            .as_ref()
            .and_then(|c| c.start)
            .map(|[x, y]| coord! { x: x, y: y })
    });
    let goal = args.goal.or_else(|| {
        file_config
            .as_ref()
            .and_then(|c| c.goal)
            .map(|[x, y]| coord! { x: x, y: y })
    });
    let output = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()));

    println!("polyroute - Polygon Arena Path Planner");
    println!("======================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Polygons: {}", count);
        println!(
            "  Domain: [{}, {}] x [{}, {}]",
            domain.min_x,
            domain.max_x(),
            domain.min_y,
            domain.max_y()
        );
        println!(
            "  Edges per polygon: {}..={}",
            generator.min_edges, generator.max_edges
        );
        println!(
            "  Attempts: {} per round, {} shrink rounds (factor {})",
            generator.max_attempts, generator.shrink_rounds, generator.shrink_factor
        );
        match seed {
            Some(s) => println!("  Seed: {}", s),
            None => println!("  Seed: random"),
        }
        if let Some(ref path) = output {
            println!("  Output: {}", path.display());
        }
        println!();
    }

    let spinner = create_spinner(&format!("Generating {} polygons...", count));
    let start_time = Instant::now();
    let field = PolygonField::generate_with(count, domain, &generator)
        .context("Failed to generate polygon field; try fewer polygons or a larger domain")?;
    spinner.finish_with_message(format!(
        "Generated {} non-overlapping polygons [{:.1}s]",
        field.len(),
        start_time.elapsed().as_secs_f32()
    ));

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut selection = SelectionState::new(&field);
    for (role, requested) in [(Role::Start, start), (Role::Goal, goal)] {
        let point = match requested {
            Some(p) => p,
            None => field
                .random_free_point(&mut rng, defaults::FREE_POINT_ATTEMPTS)
                .with_context(|| format!("Could not find a free {} point", role))?,
        };

        match selection.try_set_point(point) {
            Selection::Accepted(accepted) => {
                println!("Selected {} point ({:.4}, {:.4})", accepted, point.x, point.y);
            }
            Selection::Rejected(reason) => {
                bail!(
                    "Cannot use ({:.4}, {:.4}) as {} point: {}. Please select a point outside the polygons.",
                    point.x,
                    point.y,
                    role,
                    reason
                );
            }
        }
    }

    let (start, goal) = selection
        .endpoints()
        .context("Start and goal were not both selected")?;

    let route = plan(&field, start, goal).context("Failed to plan route")?;
    print_route(&route);

    if let Some(ref path) = output {
        let spinner = create_spinner("Writing scene file...");
        write_scene(path, &field, Some(&route)).context("Failed to write scene file")?;
        spinner.finish_with_message(format!("Wrote scene to {}", path.display()));
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn print_route(route: &Route) {
    println!();
    match route.deflection() {
        Deflection::Direct => println!("Route: clear line of sight"),
        Deflection::Touch(p) => {
            println!("Route: touches an obstacle at ({:.4}, {:.4})", p.x, p.y)
        }
        Deflection::Follow(stretch) => println!(
            "Route: follows obstacle boundary from ({:.4}, {:.4}) to ({:.4}, {:.4})",
            stretch.start.x, stretch.start.y, stretch.end.x, stretch.end.y
        ),
    }

    for (i, p) in route.waypoints().iter().enumerate() {
        println!("  {}: ({:.4}, {:.4})", i, p.x, p.y);
    }
    println!("  Length: {:.4}", route.length());
}

fn parse_point(s: &str) -> Result<Coord<f64>, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|e| format!("invalid x coordinate '{}': {}", x.trim(), e))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|e| format!("invalid y coordinate '{}': {}", y.trim(), e))?;
    Ok(coord! { x: x, y: y })
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
