use polygon_weather::{
    Dashboard, DashboardError, Intent, LatLon, MapEvent, OpenMeteo, TimeRange, VariableId,
};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    let source = OpenMeteo::builder().timeout(Duration::from_secs(10)).build()?;
    let week = TimeRange::days(
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 7, 7).unwrap(),
    )?;
    let mut dashboard = Dashboard::builder()
        .source(Arc::new(source))
        .variable(VariableId::Temperature)
        .analysis_range(week)
        .build();

    // Amsterdam and Madrid, clicked out on the map.
    let shapes = [
        vec![
            LatLon(52.30, 4.75),
            LatLon(52.43, 4.85),
            LatLon(52.40, 5.02),
            LatLon(52.30, 5.00),
        ],
        vec![LatLon(40.35, -3.80), LatLon(40.52, -3.70), LatLon(40.38, -3.55)],
    ];
    for shape in shapes {
        dashboard.handle(Intent::StartDrawing);
        for point in shape {
            dashboard.map_event(MapEvent::Click(point), |_| false);
        }
        dashboard.map_event(MapEvent::SecondaryClick { polygon: None }, |_| false);
    }
    dashboard.settle().await;
    print_polygons(&dashboard);

    dashboard.select_variable(VariableId::WindSpeed);
    dashboard.settle().await;
    print_polygons(&dashboard);

    println!("{}", dashboard.view().to_json()?);
    Ok(())
}

fn print_polygons(dashboard: &Dashboard) {
    let variable = dashboard.variable();
    println!("{} ({})", variable.name, dashboard.timeline().analysis_range);
    for polygon in dashboard.polygons() {
        match polygon.value {
            Some(value) => println!(
                "  {}: {:.1} {} -> {}",
                polygon.id, value, variable.unit, polygon.color
            ),
            None => println!("  {}: no data -> {}", polygon.id, polygon.color),
        }
    }
}
