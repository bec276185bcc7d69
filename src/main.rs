use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = brag::cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
