//! Headless stealth scenario runner
//!
//! Builds a corridor with a closet, a wall and one or more agents, walks the
//! player into view, hides in the closet, waits, and steps back out. Prints
//! the resulting detection timeline as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;
use serde::Serialize;

use hideout::concealment::{ConcealmentSpot, SpotCatalogue};
use hideout::core::config::StealthConfig;
use hideout::core::error::Result;
use hideout::core::types::{Pose, SpotId};
use hideout::host::{AffordanceState, KinematicAvatar, PromptState, ScriptedNavigator, StealthEvent};
use hideout::interaction::InteractionProbe;
use hideout::simulation::{StealthWorld, TickInput, TickReport, TickServices};
use hideout::spatial::{Obstacle, ObstacleField};

const CLOSET: SpotId = SpotId(1);

/// Headless stealth runner - scripted hide-and-seek in a corridor
#[derive(Parser, Debug)]
#[command(name = "stealth_sim")]
#[command(about = "Run a scripted stealth scenario and print the detection timeline")]
struct Args {
    /// TOML config file (missing keys keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON hide spot file; spot 1 is used as the closet
    #[arg(long)]
    spots: Option<PathBuf>,

    /// Number of agents at the end of the corridor
    #[arg(long, default_value_t = 1)]
    agents: usize,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// When the player presses interact at the closet
    #[arg(long, default_value_t = 1.0)]
    hide_at: f64,

    /// When the player presses interact again to leave
    #[arg(long, default_value_t = 7.0)]
    exit_at: f64,

    /// Total simulated seconds
    #[arg(long, default_value_t = 9.0)]
    duration: f64,

    /// Override the config's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Serialize)]
struct TimelineEntry {
    time: f64,
    event: &'static str,
}

#[derive(Serialize)]
struct ScenarioResult {
    seed: u64,
    ticks: u64,
    agents: usize,
    first_detected_at: Option<f64>,
    concealed_at: Option<f64>,
    undetected_at: Option<f64>,
    revealed_at: Option<f64>,
    caught: bool,
    final_report: Option<TickReport>,
    timeline: Vec<TimelineEntry>,
}

fn default_spots() -> SpotCatalogue {
    let closet = ConcealmentSpot::enclosure(CLOSET, Pose::at(Vec3::new(2.5, 0.0, 10.0)))
        .with_entry_waypoints(vec![Pose::at(Vec3::new(1.5, 0.0, 10.0))])
        .with_peek_pose(Pose::at(Vec3::new(2.0, 0.0, 10.0)))
        .with_hide_fov(50.0);
    [closet].into_iter().collect()
}

fn build_world(
    config: StealthConfig,
    spots: SpotCatalogue,
    agent_count: usize,
) -> (StealthWorld, ObstacleField) {
    let start = Pose::from_yaw(Vec3::new(0.0, 0.0, 8.0), 0.0);
    let mut world = StealthWorld::new(config, spots, KinematicAvatar::new(start));

    // Corridor walls, with a pillar that hides part of the far end
    let walls = ObstacleField::new()
        .with(Obstacle::new(Vec3::new(-3.5, 0.0, -2.0), Vec3::new(-3.0, 3.0, 14.0)))
        .with(Obstacle::new(Vec3::new(3.5, 0.0, -2.0), Vec3::new(4.0, 3.0, 14.0)))
        .with(Obstacle::centered(Vec3::new(-1.5, 1.5, 5.0), Vec3::new(0.4, 1.5, 0.4)));

    for i in 0..agent_count {
        let x = -2.0 + (i % 5) as f32;
        let z = -((i / 5) as f32);
        world.spawn_agent(Pose::at(Vec3::new(x, 0.0, z)));
    }

    (world, walls)
}

fn run(args: &Args) -> Result<ScenarioResult> {
    let mut config = match &args.config {
        Some(path) => StealthConfig::load(path)?,
        None => StealthConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let spots = match &args.spots {
        Some(path) => SpotCatalogue::load(path)?,
        None => default_spots(),
    };
    spots.require(CLOSET)?;

    let (mut world, walls) = build_world(config, spots, args.agents);
    let mut nav = ScriptedNavigator::new();
    let mut prompt = PromptState::default();
    let mut affordances = AffordanceState::default();

    let mut result = ScenarioResult {
        seed,
        ticks: 0,
        agents: args.agents,
        first_detected_at: None,
        concealed_at: None,
        undetected_at: None,
        revealed_at: None,
        caught: false,
        final_report: None,
        timeline: Vec::new(),
    };

    let mut pressed_hide = false;
    let mut pressed_exit = false;

    tracing::info!(seed, agents = args.agents, "Scenario started");

    while world.now() < args.duration {
        let now = world.now();
        let mut input = TickInput::idle(args.dt);

        if !pressed_hide && now >= args.hide_at {
            input.interact_pressed = true;
            input.probe = Some(InteractionProbe::spot(CLOSET, 2.5));
            pressed_hide = true;
        } else if !pressed_exit && now >= args.exit_at {
            input.interact_pressed = true;
            pressed_exit = true;
        }

        let mut events: Vec<StealthEvent> = Vec::new();
        let mut services = TickServices {
            occlusion: &walls,
            navigation: &mut nav,
            events: &mut events,
            prompt: &mut prompt,
            affordances: &mut affordances,
        };
        let report = world.tick(&input, &mut services);

        for event in &events {
            match event.name() {
                "fully_concealed" => {
                    result.concealed_at.get_or_insert(report.time);
                }
                "exited" => {
                    result.revealed_at = Some(report.time);
                }
                _ => {}
            }
            result.timeline.push(TimelineEntry {
                time: report.time,
                event: event.name(),
            });
        }

        if report.detected {
            result.first_detected_at.get_or_insert(report.time);
        } else if result.first_detected_at.is_some() && result.undetected_at.is_none() {
            result.undetected_at = Some(report.time);
            tracing::info!(time = report.time, "Player no longer detected");
        }

        result.caught |= report.caught;
        result.ticks = report.tick;
        result.final_report = Some(report);
    }

    tracing::info!(ticks = result.ticks, "Scenario finished");
    Ok(result)
}

fn print_text(result: &ScenarioResult) {
    let fmt = |t: Option<f64>| t.map_or_else(|| "never".to_string(), |t| format!("{:.2}s", t));

    println!("Stealth Scenario");
    println!("================");
    println!("Seed:              {}", result.seed);
    println!("Agents:            {}", result.agents);
    println!("Ticks:             {}", result.ticks);
    println!("First detected:    {}", fmt(result.first_detected_at));
    println!("Fully concealed:   {}", fmt(result.concealed_at));
    println!("Detection lost:    {}", fmt(result.undetected_at));
    println!("Revealed again:    {}", fmt(result.revealed_at));
    println!("Caught:            {}", result.caught);
    println!();
    println!("Timeline:");
    for entry in &result.timeline {
        println!("  {:>7.2}s  {}", entry.time, entry.event);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hideout=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = run(&args)?;

    match args.format.as_str() {
        "text" => print_text(&result),
        _ => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
