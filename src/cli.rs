// cli.rs - Command-line interface configuration
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "trefoil")]
#[command(about = "Decorative trefoil-knot scene", long_about = None)]
pub struct Cli {
    /// Show the settings panel (progress slider overlay)
    #[arg(long = "gui", default_value = "false")]
    pub gui: bool,
}
