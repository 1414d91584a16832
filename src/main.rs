#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use colored::Colorize;

    if let Err(e) = orgdir::app::run_cli() {
        eprintln!("{} {}", "[ERR]".red().bold(), e);
        std::process::exit(1);
    }
}

// The browser build runs from `web::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
