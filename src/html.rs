//! HTML documents for the served pages and the exported file.
//!
//! Pages load plotly.js from its CDN; everything else is inline so a document works on its own.

use crate::chart::Figure;
use crate::error::Re;
use crate::reactive::{ControlOptions, InputId, OutputId};
use std::fmt::Write;

/// The charting library, pinned so exports are reproducible.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub const PAGE_TITLE: &str = "Solar Panel Waste Dashboard";
const HEADING: &str = "Solar Panel Waste Projections - Australia";
const SUBHEADING: &str = "Visualizing waste from small-scale and large-scale PV systems";

/// The path the dashboard page posts control changes to.
pub const UPDATE_PATH: &str = "/_update";

/// Escapes text for use in element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON that is safe to place inside a `<script>` element.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// A self-contained document holding one chart, followed by `post_script`.
///
/// The output depends only on its arguments, so the same figure always yields the same bytes.
pub fn standalone(figure: &Figure, div_id: &str, title: &str, post_script: &str) -> Re<String> {
    let json = script_json(&figure.to_json()?);
    let div = escape(div_id);
    let div_json = serde_json::Value::String(div_id.to_string());
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{PLOTLY_CDN}" charset="utf-8"></script>
</head>
<body>
<div id="{div}" class="plotly-graph-div" style="height:100%; width:100%;"></div>
<script type="text/javascript">
(function () {{
    var figure = {json};
    Plotly.newPlot({div_json}, figure.data, figure.layout, {{"responsive": true}});
}})();
</script>
{post_script}
</body>
</html>
"#,
        title = escape(title),
    ))
}

/// The filtered dashboard: two dropdowns, the graph and the year slider.
///
/// The page fetches `UPDATE_PATH` whenever a control changes and once on load. Requests are
/// chained so that a session never has two in flight, and each reply replaces the whole figure.
pub fn dashboard(options: &ControlOptions) -> String {
    let initial = options.initial();

    let mut regions = String::new();
    for region in options.regions() {
        let selected = if region == initial.region() { " selected" } else { "" };
        let region = escape(region);
        let _ = writeln!(regions, r#"<option value="{region}"{selected}>{region}</option>"#);
    }

    let mut systems = String::new();
    for system in options.systems() {
        let selected = if *system == initial.system() { " selected" } else { "" };
        let _ = writeln!(systems, r#"<option value="{system}"{selected}>{system}</option>"#);
    }

    let mut marks = String::new();
    for year in options.years() {
        let _ = writeln!(marks, r#"<option value="{year}" label="{year}"></option>"#);
    }

    let ids = serde_json::Value::from(
        InputId::ALL
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>(),
    );
    let year_slider = InputId::YearSlider;
    let region_filter = InputId::RegionFilter;
    let system_filter = InputId::SystemTypeFilter;
    let graph = OutputId::WasteGraph;
    let graph_json = serde_json::Value::String(graph.to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{PAGE_TITLE}</title>
<script src="{PLOTLY_CDN}" charset="utf-8"></script>
</head>
<body>
<div style="padding: 20px">
<h1 style="text-align: center">{HEADING}</h1>
<h3 style="text-align: center">{SUBHEADING}</h3>
<select id="{region_filter}" style="display: block; width: 50%; margin: auto">
{regions}</select>
<select id="{system_filter}" style="display: block; width: 50%; margin: auto; margin-top: 10px">
{systems}</select>
<div id="{graph}"></div>
<input id="{year_slider}" type="range" min="{min}" max="{max}" step="1" value="{value}" list="year-marks" style="width: 100%" />
<datalist id="year-marks">
{marks}</datalist>
<div style="text-align: center"><output id="year-value" for="{year_slider}">{value}</output></div>
</div>
<script type="text/javascript">
(function () {{
    var inputs = {ids};
    var queue = Promise.resolve();
    function update(trigger) {{
        var params = new URLSearchParams();
        if (trigger) {{ params.set("trigger", trigger); }}
        inputs.forEach(function (id) {{
            params.set(id, document.getElementById(id).value);
        }});
        queue = queue.then(function () {{
            return fetch("{UPDATE_PATH}?" + params.toString())
                .then(function (response) {{ return response.json(); }})
                .then(function (outputs) {{
                    var figure = outputs[{graph_json}];
                    if (figure) {{
                        return Plotly.react({graph_json}, figure.data, figure.layout);
                    }}
                }})
                .catch(function (err) {{ console.error(err); }});
        }});
    }}
    inputs.forEach(function (id) {{
        document.getElementById(id).addEventListener("change", function () {{
            if (id === "{year_slider}") {{
                document.getElementById("year-value").value = this.value;
            }}
            update(id);
        }});
    }});
    update(null);
}})();
</script>
</body>
</html>
"#,
        min = options.min_year(),
        max = options.max_year(),
        value = initial.year(),
    )
}
