//! Self-contained Leaflet HTML pages.
//!
//! Pages load Leaflet from a CDN and embed the map data as a JSON literal,
//! so a written file opens directly in a browser with no server.

use std::path::Path;

use serde::Serialize;

use crate::{MapDocument, MapView, RenderError, TileLayer};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const COMMON_SCRIPT: &str = r"
function baseMap(data) {
  const map = L.map('map').setView(data.view.center, data.view.zoom);
  L.tileLayer(data.tiles.urlTemplate, {
    attribution: data.tiles.attribution,
    maxZoom: data.tiles.maxZoom,
  }).addTo(map);
  return map;
}

function circleLayer(circles) {
  const layer = L.layerGroup();
  for (const m of circles) {
    const color = m.color ?? '#3388ff';
    const circle = L.circleMarker([m.latitude, m.longitude], {
      radius: m.radius,
      color: color,
      fillColor: m.fillColor ?? color,
      weight: m.weight,
      opacity: 1,
      fill: true,
      fillOpacity: m.fillOpacity,
    });
    if (m.popup) circle.bindPopup(m.popup);
    layer.addLayer(circle);
  }
  return layer;
}
";

const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>__TITLE__</title>
<link rel="stylesheet" href="__LEAFLET_CSS__">
<script src="__LEAFLET_JS__"></script>
<style>
html, body, #map { height: 100%; margin: 0; }
.legend { background: white; padding: 6px 8px; font: 12px sans-serif; line-height: 18px; }
.legend i { width: 18px; height: 18px; float: left; margin-right: 6px; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const data = __DATA__;
__COMMON__
const map = baseMap(data);
circleLayer(data.circles).addTo(map);
for (const p of data.pins) {
  const icon = L.divIcon({ className: 'pin', html: p.icon === 'home' ? '&#8962;' : '&#9679;', iconSize: [20, 20] });
  const pin = L.marker([p.latitude, p.longitude], { icon: icon });
  if (p.popup) pin.bindPopup(p.popup);
  pin.addTo(map);
}
if (data.legend) {
  const legend = L.control({ position: 'topright' });
  legend.onAdd = function () {
    const div = L.DomUtil.create('div', 'legend');
    const title = document.createElement('b');
    title.textContent = data.legend.title;
    div.appendChild(title);
    for (const e of data.legend.entries) {
      const row = document.createElement('div');
      const swatch = document.createElement('i');
      swatch.style.background = e.color;
      row.appendChild(swatch);
      row.appendChild(document.createTextNode(e.label));
      div.appendChild(row);
    }
    return div;
  };
  legend.addTo(map);
}
</script>
</body>
</html>
"#;

const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>__TITLE__</title>
<link rel="stylesheet" href="__LEAFLET_CSS__">
<script src="__LEAFLET_JS__"></script>
<style>
html, body { height: 100%; margin: 0; font: 14px sans-serif; }
#filters { display: flex; gap: 8px; padding: 6px; }
#filters select { flex: 1; min-height: 6em; }
#map { height: calc(100vh - 8em); }
</style>
</head>
<body>
<div id="filters">
  <select id="mode_selection" multiple title="Select mode to apply filter or refresh page to show all"></select>
  <select id="band_selection" multiple title="Select band to apply filter or refresh page to show all"></select>
</div>
<div id="map"></div>
<script>
const data = __DATA__;
__COMMON__
const map = baseMap(data);
let spots = L.layerGroup().addTo(map);

function selected(id) {
  return Array.from(document.getElementById(id).selectedOptions).map(o => o.value).join(',');
}

async function refresh(filtered) {
  const url = filtered
    ? `/api/markers?bands=${encodeURIComponent(selected('band_selection'))}&modes=${encodeURIComponent(selected('mode_selection'))}`
    : '/api/markers';
  const layer = await (await fetch(url)).json();
  map.removeLayer(spots);
  spots = circleLayer(layer.markers).addTo(map);
}

function fill(id, options, selectedValues) {
  const select = document.getElementById(id);
  for (const value of options) {
    const option = new Option(value, value, false, selectedValues.includes(value));
    select.add(option);
  }
  select.addEventListener('change', () => refresh(true));
}

fetch('/api/filters').then(r => r.json()).then(filters => {
  fill('mode_selection', filters.modes, filters.selectedModes);
  fill('band_selection', filters.bands, filters.selectedBands);
  refresh(false);
});
</script>
</body>
</html>
"#;

/// Serializes `value` for embedding inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn fill_template(template: &str, title: &str, data: &str) -> String {
    template
        .replace("__TITLE__", &html_escape::encode_text(title))
        .replace("__LEAFLET_CSS__", LEAFLET_CSS)
        .replace("__LEAFLET_JS__", LEAFLET_JS)
        .replace("__COMMON__", COMMON_SCRIPT)
        .replace("__DATA__", data)
}

/// Renders a map document as a complete HTML page.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if the document cannot be serialized.
pub fn render_html(doc: &MapDocument) -> Result<String, RenderError> {
    let data = script_json(doc)?;
    Ok(fill_template(MAP_TEMPLATE, &doc.title, &data))
}

/// Renders a map document and writes it to `path`.
///
/// # Errors
///
/// Returns [`RenderError`] if serialization or the write fails.
pub fn write_html(doc: &MapDocument, path: &Path) -> Result<(), RenderError> {
    let html = render_html(doc)?;
    std::fs::write(path, html)?;
    log::info!(
        "Saved map with {} markers to {}",
        doc.circles.len() + doc.pins.len(),
        path.display()
    );
    Ok(())
}

#[derive(Serialize)]
struct DashboardData<'a> {
    view: &'a MapView,
    tiles: &'a TileLayer,
}

/// Renders the dashboard page.
///
/// The page loads filter options from `/api/filters` and marker layers
/// from `/api/markers`.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if the view cannot be serialized.
pub fn dashboard_html(title: &str, view: &MapView, tiles: &TileLayer) -> Result<String, RenderError> {
    let data = script_json(&DashboardData { view, tiles })?;
    Ok(fill_template(DASHBOARD_TEMPLATE, title, &data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::CircleMarker;
    use crate::{DASHBOARD_ZOOM, DEFAULT_CENTER};

    fn doc_with_popup(popup: &str) -> MapDocument {
        MapDocument {
            title: "Test <map>".to_string(),
            view: MapView {
                center: DEFAULT_CENTER,
                zoom: 2,
            },
            tiles: TileLayer::open_street_map(),
            circles: vec![CircleMarker {
                latitude: 1.0,
                longitude: 2.0,
                radius: 5.0,
                color: None,
                fill_color: None,
                weight: 3.0,
                fill_opacity: 1.0,
                popup: Some(popup.to_string()),
            }],
            pins: Vec::new(),
            legend: None,
        }
    }

    #[test]
    fn page_embeds_data_and_escapes_title() {
        let html = render_html(&doc_with_popup("hello")).unwrap();
        assert!(html.contains("<title>Test &lt;map&gt;</title>"));
        assert!(html.contains("\"popup\":\"hello\""));
        assert!(html.contains(LEAFLET_JS));
        assert!(!html.contains("__DATA__"));
    }

    #[test]
    fn script_breakout_is_neutralized() {
        let html = render_html(&doc_with_popup("</script><script>alert(1)")).unwrap();
        assert!(!html.contains("</script><script>alert"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join(format!("sota_map_render_{}.html", std::process::id()));
        write_html(&doc_with_popup("x"), &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<!DOCTYPE html>"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn dashboard_page_wires_filters() {
        let view = MapView {
            center: DEFAULT_CENTER,
            zoom: DASHBOARD_ZOOM,
        };
        let html = dashboard_html("SOTA spots", &view, &TileLayer::open_street_map()).unwrap();
        assert!(html.contains("id=\"band_selection\""));
        assert!(html.contains("id=\"mode_selection\""));
        assert!(html.contains("/api/filters"));
        assert!(html.contains("\"zoom\":3"));
    }
}
