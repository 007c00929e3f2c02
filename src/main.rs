//! Generates a zone field from the command line and samples it.

use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::{Parser, ValueEnum};

use hex_zones::math::SmoothingKernel;
use hex_zones::zones::default_biomes;
use hex_zones::{FieldConfig, ZoneField, ZoneFieldPlugin};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KernelArg {
    Linear,
    Quadratic,
    Smoothstep,
    Smootherstep,
    EaseOutCubic,
}

impl From<KernelArg> for SmoothingKernel {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::Linear => Self::Linear,
            KernelArg::Quadratic => Self::Quadratic,
            KernelArg::Smoothstep => Self::Smoothstep,
            KernelArg::Smootherstep => Self::Smootherstep,
            KernelArg::EaseOutCubic => Self::EaseOutCubic,
        }
    }
}

/// Build a hex zone field and query heights and influences.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Seed for biome and zone size draws.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Rings of the backing grid.
    #[arg(long, default_value_t = 40)]
    radius: u32,
    /// Hex side length.
    #[arg(long, default_value_t = 10.0)]
    side: f32,
    /// Half-width of the square land bounds, centered on the origin.
    #[arg(long, default_value_t = 500.0)]
    extent: f32,
    /// Shepard search radius.
    #[arg(long, default_value_t = 25.0)]
    search_radius: f32,
    /// Smoothing kernel for the Shepard falloff.
    #[arg(long, value_enum, default_value_t = KernelArg::Smoothstep)]
    kernel: KernelArg,
    /// Query point `x,y`; may be repeated.
    #[arg(long = "sample", value_parser = parse_point)]
    samples: Vec<Vec2>,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let parse = |v: &str| v.trim().parse::<f32>().map_err(|e| format!("`{v}`: {e}"));
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = FieldConfig {
        land_bounds: Rect::from_center_half_size(Vec2::ZERO, Vec2::splat(args.extent)),
        hex_side: args.side,
        grid_radius: args.radius,
        search_radius: args.search_radius,
        kernel: args.kernel.into(),
        seed: args.seed,
        ..default()
    };
    let biomes = default_biomes(args.seed);

    let mut app = App::new();
    app.add_plugins((LogPlugin::default(), ZoneFieldPlugin(config, biomes)));
    app.finish();
    app.cleanup();
    app.update();

    let Some(field) = app.world().get_resource::<ZoneField>() else {
        return ExitCode::FAILURE;
    };
    print_summary(field);
    for &point in &args.samples {
        print_sample(field, point);
    }
    ExitCode::SUCCESS
}

fn print_summary(field: &ZoneField) {
    println!(
        "{} cells, {} edges, {} vertices, {} zones",
        field.cells().len(),
        field.edges().len(),
        field.vertices().len(),
        field.zones().len()
    );
    let seams = field.edges().iter().filter(|e| e.payload().is_zone_border).count();
    println!("{seams} edges lie on zone borders");
    for zone in field.zones().iter().filter(|z| z.cluster().len() >= 20) {
        println!("  {:<16} {:>4} cells", zone.name(), zone.cluster().len());
    }
}

fn print_sample(field: &ZoneField, point: Vec2) {
    let (height, influence) = match (field.height_at(point), field.influence_at(point)) {
        (Ok(h), Ok(i)) => (h, i),
        (Err(err), _) | (_, Err(err)) => {
            println!("{point}: {err}");
            return;
        }
    };
    let shares: Vec<String> = influence
        .iter()
        .map(|(zone, w)| {
            let name = field.zone(zone).map_or("?", |z| z.name());
            format!("{name} {:.0}%", w * 100.0)
        })
        .collect();
    println!("{point}: height {height:.3}, {}", shares.join(", "));
}
