//! Scopify CLI
//!
//! Applies local-by-default CSS Modules scoping to a stylesheet and prints
//! the result.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use scopify_common::warning::clear_warnings;
use scopify_css::parse_stylesheet;
use scopify_modules::{Config, LocalByDefault, Mode, Options};

/// Scopify: local-by-default scoping for CSS Modules
#[derive(Parser, Debug)]
#[command(name = "scopify")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Scope a file and print the result
    scopify styles.module.css

    # Read from stdin, write to a file
    cat app.css | scopify -o app.scoped.css

    # Reject selectors without a local class or id
    scopify -m pure components.css

    # Options from a JSON file
    scopify -c scopify.json styles.css

    # Prefix relative urls in locally scoped rules
    scopify --url-prefix ./assets/ styles.css
"#)]
struct Cli {
    /// Stylesheet to scope (stdin when omitted)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Write the scoped stylesheet here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Scoping mode: local, global, or pure (overrides --config)
    #[arg(short, long, value_name = "MODE")]
    mode: Option<String>,

    /// JSON configuration file, e.g. {"mode": "pure"}
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prefix for relative urls in locally scoped declarations
    #[arg(long, value_name = "PREFIX")]
    url_prefix: Option<String>,

    /// Log every rewritten rule
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = load_options(cli)?;
    let css = read_input(cli.path.as_deref())?;

    clear_warnings();
    let mut sheet = parse_stylesheet(&css).context("failed to parse stylesheet")?;
    LocalByDefault::new(options)
        .process(&mut sheet)
        .context("failed to scope stylesheet")?;
    let scoped = sheet.to_string();

    match &cli.output {
        Some(path) => fs::write(path, scoped)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(scoped.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}

/// Build the transform options: config file first, then command-line flags.
fn load_options(cli: &Cli) -> anyhow::Result<Options> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: Config = serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?;
            config.into_options()?
        }
        None => Options::new(),
    };

    if let Some(mode) = &cli.mode {
        options = options.with_mode(Mode::parse(mode)?);
    }

    if let Some(prefix) = cli.url_prefix.clone() {
        options = options.with_rewrite_url(move |global, url| {
            if global || !is_relative_url(url) {
                url.to_string()
            } else {
                format!("{prefix}{url}")
            }
        });
    }

    log::debug!(target: "scopify", "options: {options:?}");
    Ok(options)
}

/// Read the stylesheet from `path`, or from stdin when there is none.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()));
    }
    let mut css = String::new();
    let _ = io::stdin()
        .read_to_string(&mut css)
        .context("failed to read stdin")?;
    Ok(css)
}

/// Whether `url` is resolved against the stylesheet's location.
fn is_relative_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() || url.starts_with('/') || url.starts_with('#') {
        return false;
    }
    // Anything with a scheme before the first `:` is absolute.
    match url.split_once(':') {
        Some((scheme, _)) => !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_urls() {
        assert!(is_relative_url("./image.png"));
        assert!(is_relative_url("images/a.png"));
        assert!(is_relative_url("../a.png?x=1:2"));
    }

    #[test]
    fn test_absolute_urls() {
        assert!(!is_relative_url("/image.png"));
        assert!(!is_relative_url("//cdn.example.com/a.png"));
        assert!(!is_relative_url("https://example.com/a.png"));
        assert!(!is_relative_url("data:image/png;base64,xyz"));
        assert!(!is_relative_url("#filter"));
        assert!(!is_relative_url(""));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["scopify", "-m", "pure", "--url-prefix", "/static/", "a.css"]);
        assert_eq!(cli.mode.as_deref(), Some("pure"));
        assert_eq!(cli.path, Some(PathBuf::from("a.css")));
        let options = load_options(&cli).unwrap();
        assert_eq!(options.mode, Mode::Pure);
        let rewrite = options.rewrite_url.unwrap();
        assert_eq!(rewrite(false, "./a.png"), "/static/./a.png");
        assert_eq!(rewrite(true, "./a.png"), "./a.png");
    }

    #[test]
    fn test_invalid_mode_flag() {
        let cli = Cli::parse_from(["scopify", "--mode", "strict"]);
        assert!(load_options(&cli).is_err());
    }
}
