use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;
use waymark_navigation::grouping::group_waypoints;

use crate::file_utils::read_props;

#[derive(Args)]
pub struct GroupsArgs {
    /// Navigation props JSON file
    #[arg(short = 'i', long)]
    input: PathBuf,
}

pub fn run(args: GroupsArgs) -> anyhow::Result<()> {
    let props = read_props(&args.input)?;
    let groups = group_waypoints(&props.waypoints())?;

    let mut table = Table::new();
    table.set_header(vec!["Group", "Waypoints", "First", "Last"]);

    for group in &groups {
        let first = group.waypoints().first();
        let last = group.waypoints().last();
        let describe = |waypoint: Option<&waymark_navigation::Waypoint>| {
            waypoint
                .map(|w| format!("{:.6}, {:.6}", w.longitude(), w.latitude()))
                .unwrap_or_default()
        };

        table.add_row(vec![
            group.index().to_string(),
            group.len().to_string(),
            describe(first),
            describe(last),
        ]);
    }

    println!("{table}");
    Ok(())
}
