//! Stencil CLI - Component generation and feature installation from templates

use anyhow::Result;
use clap::{Parser, Subcommand};
use stencil_core::tui::Request;
use stencil_core::ProductConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Stencil product configuration
#[derive(Clone)]
pub struct StencilConfig;

impl ProductConfig for StencilConfig {
    fn name(&self) -> &'static str {
        "stencil"
    }

    fn display_name(&self) -> &'static str {
        "Stencil"
    }

    fn default_template_url(&self) -> &'static str {
        "https://github.com/stencil-dev/standard-template"
    }

    fn template_url_env(&self) -> &'static str {
        "STENCIL_TEMPLATE_URL"
    }

    fn home_env(&self) -> &'static str {
        "STENCIL_HOME"
    }
}

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(about = "Generate components and install features from project templates")]
#[command(version)]
pub struct Args {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bind the project to a template and write its manifest
    Init {
        /// Project name; `.` uses the directory name
        name: Option<String>,

        /// Template repository URL or local directory
        #[arg(long = "template-url")]
        template_url: Option<String>,

        /// Template tag (defaults to the latest semver tag)
        #[arg(long)]
        tag: Option<String>,
    },
    /// Generate a component of the given kind
    Generate {
        /// Component kind declared by the template catalog
        kind: Option<String>,

        /// Component name, optionally nested (e.g. billing/invoice)
        name: Option<String>,
    },
    /// Install a feature declared by the template catalog
    Install {
        /// Installation command name
        command: Option<String>,
    },
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        match command {
            Command::Init {
                name,
                template_url,
                tag,
            } => Request::Init {
                project: name,
                template_url,
                tag,
            },
            Command::Generate { kind, name } => Request::Generate { kind, name },
            Command::Install { command } => Request::Install { command },
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "stencil=debug,stencil_core=debug"
    } else {
        "stencil=warn,stencil_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let project_root = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let result = stencil_core::run(&StencilConfig, project_root, args.command.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
