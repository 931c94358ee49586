use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use clap::Args;
use comfy_table::Table;
use geojson::{Feature, GeoJson, Geometry, JsonObject, Value::LineString};
use tracing::info;
use waymark_navigation::{compile::CompiledRoute, planner::RoutePlanner};

use crate::{directions::CliDirections, file_utils::read_props, parsers};

#[derive(Args)]
pub struct RouteArgs {
    /// Navigation props JSON file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Use straight-line directions instead of the directions API
    #[arg(long)]
    offline: bool,

    /// Timeout of each directions request (e.g., "10s", "PT30S")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<std::time::Duration>,

    /// Write the compiled shape as a GeoJSON feature
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

fn to_feature(route: &CompiledRoute) -> Feature {
    let points: Vec<Vec<f64>> = route
        .shape
        .iter()
        .map(|point| vec![point.x(), point.y()])
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("distance".to_string(), route.distance.into());
    properties.insert(
        "expectedTravelTime".to_string(),
        route.expected_travel_time.into(),
    );
    properties.insert("legs".to_string(), route.leg_count().into());
    properties.insert("groups".to_string(), route.group_count.into());

    Feature {
        bbox: None,
        properties: Some(properties),
        foreign_members: None,
        id: None,
        geometry: Some(Geometry::new(LineString(points))),
    }
}

pub fn print_summary(route: &CompiledRoute) {
    let mut table = Table::new();
    table.set_header(vec!["Leg", "Summary", "Distance (m)", "Travel time (s)"]);

    for (i, leg) in route.legs.iter().enumerate() {
        table.add_row(vec![
            i.to_string(),
            leg.summary.clone(),
            format!("{:.1}", leg.distance),
            format!("{:.1}", leg.expected_travel_time),
        ]);
    }
    table.add_row(vec![
        String::from("total"),
        format!("{} groups", route.group_count),
        format!("{:.1}", route.distance),
        format!("{:.1}", route.expected_travel_time),
    ]);

    println!("{table}");
}

pub async fn run(args: RouteArgs) -> anyhow::Result<()> {
    let props = read_props(&args.input)?;
    let directions = CliDirections::from_env(args.offline, args.timeout)?;

    let planner = RoutePlanner::new(directions, props.dispatch_params());
    let route = planner.plan(&props.waypoints()).await?;

    print_summary(&route);

    if let Some(out) = args.out {
        let file = File::create(&out)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &GeoJson::Feature(to_feature(&route)))?;
        writer.flush()?;

        info!("Compiled route written to {}", out.display());
    }

    Ok(())
}
