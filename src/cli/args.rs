use clap::Parser;
use std::path::PathBuf;

/// Interactive virtual-goods marketplace
#[derive(Parser, Debug)]
#[command(name = "marketplace-engine")]
#[command(about = "Interactive virtual-goods marketplace with elastic pricing", long_about = None)]
pub struct CliArgs {
    /// State directory the economy is loaded from and saved to
    #[arg(
        long = "state-dir",
        value_name = "DIR",
        help = "Directory for loading/saving market and account state"
    )]
    pub state_dir: Option<PathBuf>,

    /// Units each listing starts with when a fresh catalog is initialized
    #[arg(
        long = "starting-quantity",
        value_name = "QUANTITY",
        default_value_t = 200,
        help = "Starting units per listing for a fresh catalog"
    )]
    pub starting_quantity: i64,

    /// Actor the REPL issues commands as
    #[arg(
        long = "actor",
        value_name = "ACTOR",
        default_value_t = 1,
        help = "Actor ID commands are issued as"
    )]
    pub actor: u64,
}
