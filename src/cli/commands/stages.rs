//! Stage loss rate command.

use anyhow::Result;
use deal_config::AppConfig;
use deal_scoring::StageLossTable;

use super::{load_deals, resolve_path};
use crate::cli::StagesArgs;

pub fn run(args: StagesArgs, config: &AppConfig) -> Result<()> {
    let data_path = resolve_path(args.data, config.data.path.as_ref(), "deal data")?;
    let (deals, summary) = load_deals(&data_path)?;
    let table = StageLossTable::from_deals(&deals);

    println!("Deal data: {}", data_path.display());
    println!();
    println!("  Deals:               {}", summary.rows);
    println!("  Won:                 {}", summary.won);
    println!("  Missing Cycle:       {}", summary.undefined_cycles);
    println!("  Inverted Dates:      {}", summary.inverted_cycles);
    println!("  Missing Amount:      {}", summary.missing_amounts);
    println!("  Stages:              {}", table.len());
    println!();
    print!("{}", table.summary());

    Ok(())
}
