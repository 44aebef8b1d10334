//! lodestar CLI — driving adapter for the navigation engine.
//!
//! Subcommands:
//! - `build <directory> [route] [--param key=value...] [--universal]` — build a URL
//! - `parse <url>` — parse a URL and print its components
//! - `dispatch <url...> [--first-run] [--trace]` — simulate dispatch through a fresh shell
//! - `info` — print directories, routes, and roots

use std::process;

use lodestar::{CodecConfig, DeepLink, Directory, DispatchOutcome, FnProbe, LinkCodec, SchemeKind};
use lodestar_sauron::{
    default_codec, first_run_tree, AppDirectory, AppShell, DirectoryRoute, HomeRoute, Navigator,
    OnboardingRoute, SettingsRoute,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "build" => cmd_build(&args[2..]),
        "parse" => cmd_parse(&args[2..]),
        "dispatch" => cmd_dispatch(&args[2..]),
        "info" => cmd_info(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_build(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("build requires a directory".into());
    }

    let directory = AppDirectory::from_segment(&args[0])
        .ok_or_else(|| format!("unknown directory \"{}\"", args[0]))?;

    let mut rest = &args[1..];
    let mut link = DeepLink::new(directory);
    if let Some(route) = rest.first().filter(|a| !a.starts_with("--")) {
        if !route_is_known(directory, route) {
            return Err(format!(
                "\"{route}\" names no route in directory \"{}\"",
                directory.segment()
            ));
        }
        link = link.segment(route.as_str());
        rest = &rest[1..];
    }

    let options = parse_options(rest)?;
    for (key, value) in options.params {
        link = link.param(key, value);
    }

    let kind = if options.universal {
        SchemeKind::Universal
    } else {
        SchemeKind::Internal
    };

    let codec = load_codec(options.config.as_deref())?;
    let url = codec
        .build(&link, kind)
        .map_err(|e| format!("build failed: {e}"))?;
    println!("{url}");
    Ok(())
}

fn cmd_parse(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("parse requires a URL".into());
    }

    let options = parse_options(&args[1..])?;
    let codec = load_codec(options.config.as_deref())?;
    let (link, kind) = codec
        .parse::<AppDirectory>(&args[0])
        .map_err(|e| format!("parse failed: {e}"))?;

    println!("dialect:   {kind:?}");
    println!("directory: {}", link.directory().segment());
    println!(
        "route:     {}",
        if link.route_segment().is_empty() {
            "(default)"
        } else {
            link.route_segment()
        }
    );
    for segment in link.segments().iter().skip(1) {
        println!("segment:   {segment}");
    }
    for (key, value) in link.params() {
        println!("param:     {key}={value}");
    }
    if let Some(fragment) = link.fragment_value() {
        println!("fragment:  {fragment}");
    }
    Ok(())
}

fn cmd_dispatch(args: &[String]) -> Result<(), String> {
    let mut urls: Vec<&str> = Vec::new();
    let mut first_run = false;
    let mut trace = false;
    let mut config: Option<&str> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--first-run" => first_run = true,
            "--trace" => trace = true,
            "--config" => {
                i += 1;
                config = Some(
                    args.get(i)
                        .ok_or_else(|| "--config requires a file path".to_string())?,
                );
            }
            other if other.starts_with("--") => {
                return Err(format!("unexpected argument \"{other}\""));
            }
            url => urls.push(url),
        }
        i += 1;
    }
    if urls.is_empty() {
        return Err("dispatch requires at least one URL".into());
    }

    let codec = load_codec(config)?;
    let tree = first_run_tree(Box::new(FnProbe::new("first_run", move || first_run)));
    let mut nav = Navigator::new(AppShell::new(codec, tree));

    let root = nav.shell_mut().complete_launch();
    println!("launched into: {root:?}");

    for url in urls {
        let outcome = if trace {
            let traced = nav.manage_with_trace(url);
            for probe in &traced.probed {
                println!(
                    "  probe {:<12} {}",
                    probe.handler,
                    if probe.accepted { "claimed" } else { "passed" }
                );
            }
            traced.outcome
        } else {
            nav.manage(url)
        };
        match outcome {
            DispatchOutcome::Handled { handler } => println!("{url} -> handled by {handler}"),
            DispatchOutcome::NoHandler => println!("{url} -> no handler"),
            DispatchOutcome::Rejected(e) => println!("{url} -> rejected: {e}"),
        }
    }

    println!("final root: {:?}", nav.shell().current_root());
    if let Some(link) = nav.shell().last_active_link() {
        println!("last link:  {link}");
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    let codec = default_codec();
    println!("scheme: {}://", codec.scheme());
    println!("host:   https://{}/", codec.host());

    println!("\nDirectories:");
    for dir in AppDirectory::all() {
        println!("  {:<12} root: {:?}", dir.segment(), dir.root());
        for route in route_segments(*dir) {
            println!("    /{route}");
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Route lookup
// ═══════════════════════════════════════════════════════════════════════════════

fn route_is_known(directory: AppDirectory, segment: &str) -> bool {
    match directory {
        AppDirectory::Launch | AppDirectory::Wallet | AppDirectory::Alerts => segment.is_empty(),
        AppDirectory::Onboarding => OnboardingRoute::from_segment(segment).is_some(),
        AppDirectory::Home => HomeRoute::from_segment(segment).is_some(),
        AppDirectory::Settings => SettingsRoute::from_segment(segment).is_some(),
    }
}

fn route_segments(directory: AppDirectory) -> Vec<&'static str> {
    match directory {
        AppDirectory::Launch | AppDirectory::Wallet | AppDirectory::Alerts => vec![],
        AppDirectory::Onboarding => vec![OnboardingRoute::PortfolioCuration.segment()],
        AppDirectory::Home => vec![HomeRoute::EditPortfolio.segment()],
        AppDirectory::Settings => vec![SettingsRoute::System.segment()],
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_codec(path: Option<&str>) -> Result<LinkCodec, String> {
    let Some(path) = path else {
        return Ok(default_codec());
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let is_json = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: CodecConfig = if is_json {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))?
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))?
    };
    Ok(config.into_codec())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct Options {
    params: Vec<(String, String)>,
    universal: bool,
    config: Option<String>,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--param" => {
                i += 1;
                while i < args.len() && !args[i].starts_with("--") {
                    let pair = &args[i];
                    let (key, value) = pair.split_once('=').ok_or_else(|| {
                        format!("invalid param pair \"{pair}\", expected key=value")
                    })?;
                    options.params.push((key.to_owned(), value.to_owned()));
                    i += 1;
                }
            }
            "--universal" => {
                options.universal = true;
                i += 1;
            }
            "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "--config requires a file path".to_string())?;
                options.config = Some(path.clone());
                i += 1;
            }
            other => return Err(format!("unexpected argument \"{other}\"")),
        }
    }

    Ok(options)
}

fn print_usage() {
    eprintln!(
        "Usage: lodestar <command> [options]

Commands:
  build <directory> [route] [--param key=value...] [--universal]
                                           Build a deep-link URL
  parse <url>                              Parse a URL into components
  dispatch <url...> [--first-run] [--trace]
                                           Simulate dispatch through a fresh shell
  info                                     Print directories, routes, and roots
  help                                     Show this help

Options:
  --config <path>                          Codec config (JSON or YAML)"
    );
}
