use clap::Subcommand;
use rehab_core::tracker::{clear_all, export_all};
use rehab_core::{Clock, CoreError, SystemClock};

use super::{open, print_json, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Print every stored record as JSON
    Export,
    /// Delete every stored record
    Clear {
        /// Required; clearing cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CmdResult {
    let store = open()?;

    match action {
        DataAction::Export => {
            let export = export_all(&store, SystemClock.today())?;
            print_json(&export)?;
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err(CoreError::Custom("refusing to clear data without --yes".into()).into());
            }
            clear_all(&store)?;
            println!("all data cleared");
        }
    }
    Ok(())
}
