use std::io::Read;

use anyhow::{Context, bail};
use serde_json::json;

use geofence_editor::EditorConfig;
use geofence_editor::domain::OverlayId;
use geofence_editor::editor::{
    GeofenceEditorController, HeadlessSurface, NominatimGeocoder, SavedGeometry,
};

const USAGE: &str = "usage: geofence-editor decode [--active <id>] < records.tsv
       geofence-editor search <query>";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = EditorConfig::load();

    match args.first().map(String::as_str) {
        Some("decode") => {
            let active = match args.get(1).map(String::as_str) {
                Some("--active") => Some(parse_id(
                    args.get(2).context("--active needs an id")?,
                )),
                Some(other) => bail!("unexpected argument `{other}`\n{USAGE}"),
                None => None,
            };
            decode(config, active.as_ref())
        }
        Some("search") => {
            let query = args[1..].join(" ");
            if query.trim().is_empty() {
                bail!("search needs a query\n{USAGE}");
            }
            search(config, &query).await
        }
        _ => bail!("{USAGE}"),
    }
}

/// Load `id<TAB>wkt` lines from stdin and print what the map would show
fn decode(config: EditorConfig, active: Option<&OverlayId>) -> anyhow::Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading records from stdin")?;

    let mut records = Vec::new();
    for (number, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((id, wkt)) = line.split_once('\t') else {
            log::warn!("Line {}: expected id<TAB>wkt, skipping", number + 1);
            continue;
        };
        records.push(SavedGeometry::new(parse_id(id), wkt));
    }

    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let mut editor = GeofenceEditorController::mount(HeadlessSurface::new(), geocoder, config);
    let report = editor.load_existing(&records, active);

    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| json!({ "id": s.id, "error": s.error.to_string() }))
        .collect();
    let styles = &editor.config().styles;
    let overlays: Vec<_> = editor
        .store()
        .snapshot()
        .iter()
        .map(|entry| {
            let style = styles.for_role(entry.role);
            json!({
                "id": entry.id,
                "role": entry.role,
                "geometry": entry.geometry,
                "stroke": style.stroke.to_hex(),
                "fill": style.fill.to_hex(),
            })
        })
        .collect();
    let output = json!({
        "overlays": overlays,
        "hidden": report.hidden,
        "skipped": skipped,
        "view": editor.surface().fitted_extent,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn search(config: EditorConfig, query: &str) -> anyhow::Result<()> {
    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let mut editor = GeofenceEditorController::mount(HeadlessSurface::new(), geocoder, config);
    let point = editor.search(query).await?;
    println!("{} {}", point.longitude(), point.latitude());
    Ok(())
}

fn parse_id(text: &str) -> OverlayId {
    let text = text.trim();
    match text.parse::<i64>() {
        Ok(n) => OverlayId::Number(n),
        Err(_) => OverlayId::from(text),
    }
}
