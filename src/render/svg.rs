use std::path::Path;

use crate::config::ChartLayout;
use crate::render::scene::Scene;
use crate::state::theme::{hex, Theme};

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serialize a scene to a standalone SVG document.
pub fn to_svg(scene: &Scene, layout: &ChartLayout, theme: Theme) -> String {
    let axis = hex(theme.axis_color());
    let mut lines = Vec::with_capacity(scene.marks.len() + 32);

    lines.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = layout.svg_width,
        h = layout.svg_height
    ));
    lines.push(format!(
        "  <style>.stateCircle{{fill:{fill};stroke:{stroke}}} .stateText{{fill:{text};font-size:10px;text-anchor:middle;dominant-baseline:central}} .active{{fill:{active};font-weight:bold;cursor:default}} .inactive{{fill:{inactive};font-weight:lighter;cursor:pointer}} .aText{{text-anchor:middle;font-size:13px}}</style>",
        fill = hex(theme.mark_fill()),
        stroke = hex(theme.mark_stroke()),
        text = hex(theme.mark_text()),
        active = hex(theme.active_label()),
        inactive = hex(theme.inactive_label()),
    ));
    lines.push(format!(r#"  <rect width="100%" height="100%" fill="{}"/>"#, hex(theme.plot_bg())));
    lines.push(format!(
        r#"  <g transform="translate({}, {})">"#,
        layout.margin.left, layout.margin.top
    ));

    // Bottom axis
    lines.push(format!(r#"    <g class="x-axis" transform="translate(0, {})">"#, scene.height));
    lines.push(format!(
        r#"      <line x1="0" y1="0" x2="{}" y2="0" stroke="{axis}"/>"#,
        scene.width
    ));
    lines.extend(scene.x_ticks.iter().map(|tick| {
        format!(
            r#"      <g class="tick" opacity="{:.3}" transform="translate({:.2}, 0)"><line y2="6" stroke="{axis}"/><text y="9" dy="0.71em" text-anchor="middle" font-size="10" fill="{axis}">{}</text></g>"#,
            tick.opacity,
            tick.position,
            escape(&tick.label)
        )
    }));
    lines.push("    </g>".to_string());

    // Left axis
    lines.push(r#"    <g class="y-axis">"#.to_string());
    lines.push(format!(
        r#"      <line x1="0" y1="0" x2="0" y2="{}" stroke="{axis}"/>"#,
        scene.height
    ));
    lines.extend(scene.y_ticks.iter().map(|tick| {
        format!(
            r#"      <g class="tick" opacity="{:.3}" transform="translate(0, {:.2})"><line x2="-6" stroke="{axis}"/><text x="-9" dy="0.32em" text-anchor="end" font-size="10" fill="{axis}">{}</text></g>"#,
            tick.opacity,
            tick.position,
            escape(&tick.label)
        )
    }));
    lines.push("    </g>".to_string());

    lines.extend(scene.marks.iter().map(|mark| {
        format!(
            r#"    <g><circle class="stateCircle" cx="{:.2}" cy="{:.2}" r="{}"/><text class="stateText" x="{:.2}" y="{:.2}">{}</text></g>"#,
            mark.center[0],
            mark.center[1],
            mark.radius,
            mark.center[0],
            mark.center[1],
            escape(&mark.text)
        )
    }));

    lines.extend(scene.x_labels.iter().map(|label| {
        format!(
            r#"    <text class="aText {}" data-value="{}" x="{:.2}" y="{:.2}" dominant-baseline="central">{}</text>"#,
            label_class(label.active),
            label.attribute.column(),
            label.anchor[0],
            label.anchor[1],
            escape(label.text)
        )
    }));
    lines.extend(scene.y_labels.iter().map(|label| {
        format!(
            r#"    <text class="aText {}" data-value="{}" transform="translate({:.2}, {:.2}) rotate(-90)" dominant-baseline="central">{}</text>"#,
            label_class(label.active),
            label.attribute.column(),
            label.anchor[0],
            label.anchor[1],
            escape(label.text)
        )
    }));

    lines.push("  </g>".to_string());
    lines.push("</svg>".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn label_class(active: bool) -> &'static str {
    if active {
        "active"
    } else {
        "inactive"
    }
}

/// Wrap an SVG document in a minimal page, inside the host container element.
pub fn to_html(svg: &str, container_id: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<title>Health Scatter</title>\n</head>\n<body>\n<div id=\"{}\">\n{}</div>\n</body>\n</html>\n",
        escape(container_id),
        svg
    )
}

/// Write a scene to `path`: a full HTML page for `.html`/`.htm`, plain SVG otherwise.
pub fn write_document(
    path: &Path,
    scene: &Scene,
    layout: &ChartLayout,
    theme: Theme,
    container_id: &str,
) -> std::io::Result<()> {
    let svg = to_svg(scene, layout, theme);
    let is_html = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));
    let contents = if is_html { to_html(&svg, container_id) } else { svg };
    std::fs::write(path, contents)?;
    tracing::info!("Exported chart to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::record::{sample_record, Dataset};
    use crate::render::scene::build_scene;
    use crate::state::chart_state::ChartState;

    fn scene() -> (Scene, ChartConfig) {
        let ds = Dataset::new(
            vec![
                sample_record("Alpha", "AA", [10.0, 30.0, 30000.0, 8.0, 20.0, 15.0]),
                sample_record("Beta & Co", "B<B", [15.0, 40.0, 60000.0, 12.0, 30.0, 25.0]),
            ],
            None,
        );
        let config = ChartConfig::default();
        let chart = ChartState::new(&ds, &config).unwrap();
        (build_scene(&ds, &chart, 0.0), config)
    }

    #[test]
    fn svg_has_a_circle_per_mark_and_label_classes() {
        let (scene, config) = scene();
        let svg = to_svg(&scene, &config.layout, Theme::Light);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle class=\"stateCircle\"").count(), 2);
        assert_eq!(svg.matches("aText active").count(), 2);
        assert_eq!(svg.matches("aText inactive").count(), 4);
        assert!(svg.contains(r#"data-value="income""#));
        assert!(svg.contains("B&lt;B"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn write_document_picks_format_by_extension() {
        let (scene, config) = scene();
        let dir = tempfile::tempdir().unwrap();

        for name in ["chart.html", "chart.HTM"] {
            let path = dir.path().join(name);
            write_document(&path, &scene, &config.layout, Theme::Light, "scatter").unwrap();
            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.starts_with("<!DOCTYPE html>"), "{name}");
            assert!(text.contains("<div id=\"scatter\">\n<svg"), "{name}");
        }

        for name in ["chart.svg", "chart.txt"] {
            let path = dir.path().join(name);
            write_document(&path, &scene, &config.layout, Theme::Light, "scatter").unwrap();
            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.starts_with("<svg"), "{name}");
            assert!(!text.contains("<div"), "{name}");
        }
    }

    #[test]
    fn html_wraps_svg_in_the_container() {
        let (scene, config) = scene();
        let html = to_html(&to_svg(&scene, &config.layout, Theme::Dark), &config.container_id);
        assert!(html.contains("<div id=\"scatter\">\n<svg"));
    }
}
