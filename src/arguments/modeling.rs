use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(name = "firestore-wipe")]
#[command(
    version,
    about = "firestore-wipe - Delete every document in the app's root-level Firestore collections",
    long_about = None
)]
pub struct Args {
    /// Exit with a non-zero status if any collection failed (--strict)
    #[arg(
        long,
        help = "Exit with status 2 when one or more collections could not be cleared"
    )]
    pub strict: bool,

    /// Increase log output (-v, -vv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    pub verbose: u8,
}

impl Args {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
