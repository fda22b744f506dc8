use clap::{Parser, Subcommand};
use folio::assets::Resolver;
use folio::catalog::Catalog;
use folio::preview::{NullConverter, PdftoppmConverter};
use folio::{config, output, render, serve};
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("FOLIO_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for architecture portfolios")]
#[command(long_about = "\
Static site generator for architecture portfolios

The site root holds the project archive and the parametric toolbox. folio
writes three pages next to them and can serve the result locally.

Site layout:

  <root>/
  ├── config.toml                  # Optional; merged over the stock defaults
  ├── archive/
  │   ├── illinois_pavilion/       # One directory per project id
  │   │   ├── previews/            # Preferred image source when present
  │   │   ├── 1_plan.jpg           # Else direct images, natural order
  │   │   └── boards.pdf           # Else pages rendered from the document
  │   └── ...
  ├── toolbox/
  │   ├── dome_frame/              # Tool = directory holding a .ghx
  │   │   ├── dome_frame.ghx
  │   │   └── dome_frame.gh        # Optional companion download
  │   ├── truss.ghx                # Or a standalone definition file
  │   └── truss_readme.txt         # Last non-empty line = description
  ├── index.html                   # ← generated
  ├── archive.html                 # ← generated
  ├── toolbox.html                 # ← generated
  └── ghx_content/<tool>.ghx       # ← generated, fetched by \"view code\"

Projects and per-project image overrides live in config.toml.
Run 'folio gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site, then serve it
    Build,
    /// Write index.html, archive.html, toolbox.html and the definition files
    Generate,
    /// Serve an already generated site root
    Serve,
    /// Resolve every project and tool without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            println!("==> Generating {}", cli.root.display());
            generate(&cli.root, &site_config)?;
            println!("==> Serving {}", cli.root.display());
            serve::serve(&cli.root, &site_config.server)?;
        }
        Command::Generate => {
            let site_config = config::load_config(&cli.root)?;
            generate(&cli.root, &site_config)?;
        }
        Command::Serve => {
            let site_config = config::load_config(&cli.root)?;
            serve::serve(&cli.root, &site_config.server)?;
        }
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.root.display());
            let catalog = Catalog::load(&cli.root, &site_config);
            // Documents are not converted here; only cached previews count.
            let resolver = Resolver::new(&cli.root, &site_config, &NullConverter, 0);
            let resolution = resolver.resolve_all(&catalog.projects);
            output::print_check_output(&site_config, &catalog, &resolution, &cli.root);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn generate(root: &Path, site_config: &config::SiteConfig) -> Result<(), render::RenderError> {
    let catalog = Catalog::load(root, site_config);
    info!(
        "Loaded {} projects and {} tools",
        catalog.projects.len(),
        catalog.tools.len()
    );
    let converter = PdftoppmConverter::new(&site_config.assets);
    let timestamp = jiff::Timestamp::now().as_second();
    let summary = render::generate(root, site_config, &catalog, &converter, timestamp)?;
    output::print_generate_output(&summary, root);
    Ok(())
}
