use clap::Parser;
use tracing_subscriber::EnvFilter;

use webcam_snap::cli::{load_config, resolve_request, Args};
use webcam_snap::snapshot;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let request = resolve_request(&args, &config);
    if !args.quiet {
        println!(
            "Capturing camera {} -> {}",
            request.camera.device_index,
            request.output.display()
        );
    }

    match snapshot::run(&request) {
        Ok(shot) => {
            if !args.quiet {
                println!(
                    "Saved {}x{} {} image to {}",
                    shot.width,
                    shot.height,
                    shot.format,
                    shot.path.display()
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
