mod animation;
mod color;
mod config;
mod display;
mod error;
mod geometry;
mod math3d;
mod placement;
mod render;
mod scheduler;
mod util;

use display::{Platform, Screen, SdlSurface};
use error::DisplayError;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use render::RenderSettings;
use scheduler::{build_shapes, referenced_monitors, Scheduler};
use std::process::ExitCode;

/// Parse command line arguments and return (config path, render settings).
/// Unknown arguments and unparsable values are ignored.
fn parse_args() -> (String, RenderSettings) {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = config::DEFAULT_CONFIG_PATH.to_string();
    let mut settings = RenderSettings::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => settings.vsync = false,
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 1;
                }
            },
            "--brightness" => {
                if i + 1 < args.len() {
                    if let Ok(b) = args[i + 1].parse::<f32>() {
                        settings.brightness = b;
                    }
                    i += 1;
                }
            },
            "--thickness" => {
                if i + 1 < args.len() {
                    if let Ok(t) = args[i + 1].parse::<f32>() {
                        settings.thickness = t;
                    }
                    i += 1;
                }
            },
            "--fps" => {
                if i + 1 < args.len() {
                    if let Ok(fps) = args[i + 1].parse::<u32>() {
                        settings.fps_cap = fps;
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: ornament [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --config PATH       Shape list (default: {})",
                    config::DEFAULT_CONFIG_PATH
                );
                println!("  --brightness F      Color multiplier (default: 1.0)");
                println!("  --thickness F       Base line width (default: 2.0)");
                println!("  --fps N             Frame-rate cap, 0 = uncapped (default: 0)");
                println!("  --no-vsync          Disable VSync");
                println!("  --help              Show this help message");
                println!();
                println!("Press Escape on a screen to close it; the program exits");
                println!("when every screen is closed.");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    (config_path, settings)
}

fn run(config_path: &str, settings: RenderSettings) -> Result<(), DisplayError> {
    let platform = Platform::init()?;
    let monitor_count = platform.monitor_count()?;

    let configs = config::load(config_path);
    info!("{} ornament(s) configured from {}", configs.len(), config_path);

    let monitors = referenced_monitors(&configs, monitor_count);
    let screens = platform.open_screens("ornament", &monitors, settings.vsync)?;
    let creators: Vec<_> = screens.iter().map(Screen::texture_creator).collect();
    let mut surfaces: Vec<SdlSurface> = screens
        .into_iter()
        .zip(&creators)
        .map(|(screen, creator)| screen.into_surface(creator))
        .collect();
    let mut events = platform.events()?;

    let mut rng = StdRng::from_os_rng();
    let shapes = build_shapes(&configs, monitor_count, &mut rng);
    let mut scheduler = Scheduler::new(shapes, surfaces.len(), settings, rng);
    scheduler.run(&mut surfaces, &mut events);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config_path, settings) = parse_args();
    info!(
        "brightness {:.2}, thickness {:.2}, fps cap {}, vsync {}",
        settings.brightness,
        settings.thickness,
        settings.fps_cap,
        if settings.vsync { "on" } else { "off" }
    );

    match run(&config_path, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
