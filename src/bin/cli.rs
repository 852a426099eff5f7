// src/bin/cli.rs
use pdac_scrape::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let summary = cli::run()?;
    if !summary.is_success() {
        for (section, category, reason) in &summary.failures {
            eprintln!("Error: {} [{category}] failed: {reason}", section.title());
        }
        std::process::exit(1);
    }
    Ok(())
}
