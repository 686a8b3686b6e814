//! Filter Spirit entry point.

#[cfg(feature = "cli")]
fn main() {
    env_logger::init();
    if let Err(e) = filter_spirit::cli::run_cli() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("filter_spirit was built without the `cli` feature");
    std::process::exit(1);
}
