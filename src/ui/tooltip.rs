use crate::data::record::{Dataset, Record};
use crate::processing::hit_test::HoverIndex;
use crate::render::scene::Scene;
use crate::state::chart_state::AxisSelection;

/// Tooltip for the mark under the pointer. Rebuilt every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Centre of the hovered mark, plot-area coordinates.
    pub anchor: [f64; 2],
    pub lines: [String; 3],
}

impl Tooltip {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Detail lines for one record under the current selection.
pub fn tooltip_lines(record: &Record, selection: &AxisSelection) -> [String; 3] {
    let x = selection.x();
    let y = selection.y();
    [
        record.state.clone(),
        format!("{}: {}", x.tooltip_label(), x.format_value(record.value(x))),
        format!("{}: {} %", y.tooltip_label(), record.value(y)),
    ]
}

/// Resolve the hovered mark for a pointer position in plot-area coordinates.
/// Returns `None` when the pointer is outside every mark.
pub fn hover(
    scene: &Scene,
    dataset: &Dataset,
    selection: &AxisSelection,
    pointer: [f64; 2],
) -> Option<Tooltip> {
    let marks = HoverIndex::build(scene.marks.iter().map(|m| (m.index, m.center)));
    let radius = scene.marks.first().map(|m| m.radius)?;
    let index = marks.hit(pointer[0], pointer[1], radius)?;
    let mark = scene.mark_for_record(index)?;
    let record = dataset.get(index)?;
    Some(Tooltip {
        anchor: mark.center,
        lines: tooltip_lines(record, selection),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::record::{sample_record, Attribute};
    use crate::render::scene::build_scene;
    use crate::state::chart_state::ChartState;

    fn alabama() -> Record {
        sample_record("Alabama", "AL", [19.3, 38.6, 42830.0, 13.9, 33.5, 21.1])
    }

    #[test]
    fn income_tooltip_uses_currency() {
        let lines = tooltip_lines(&alabama(), &AxisSelection::default());
        assert_eq!(
            lines,
            [
                "Alabama".to_string(),
                "Median Household Income: $42830".to_string(),
                "Obesity Rate: 33.5 %".to_string(),
            ]
        );
    }

    #[test]
    fn age_and_poverty_formats() {
        let sel = AxisSelection::new(Attribute::Age, Attribute::Smokes).unwrap();
        let lines = tooltip_lines(&alabama(), &sel);
        assert_eq!(lines[1], "Median Age: 38.6");
        assert_eq!(lines[2], "Smoking Rate: 21.1 %");

        let sel = AxisSelection::new(Attribute::Poverty, Attribute::Healthcare).unwrap();
        let lines = tooltip_lines(&alabama(), &sel);
        assert_eq!(lines[1], "Poverty Rate: 19.3 %");
        assert_eq!(lines[2], "Lack of Healthcare Rate: 13.9 %");
    }

    #[test]
    fn hover_enters_and_leaves_a_mark() {
        let ds = Dataset::new(
            vec![
                alabama(),
                sample_record("Alaska", "AK", [11.2, 33.3, 71583.0, 15.0, 29.7, 19.9]),
            ],
            None,
        );
        let chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        let scene = build_scene(&ds, &chart, 0.0);
        let center = scene.marks[1].center;

        let tip = hover(&scene, &ds, &chart.selection, [center[0] + 5.0, center[1] - 5.0]).unwrap();
        assert_eq!(tip.anchor, center);
        assert_eq!(tip.lines[0], "Alaska");
        assert!(tip.text().contains('\n'));

        assert!(hover(&scene, &ds, &chart.selection, [center[0] + 40.0, center[1]]).is_none());
    }

    #[test]
    fn hover_over_fifty_identical_records() {
        let ds = Dataset::new(vec![alabama(); 50], None);
        let chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        let scene = build_scene(&ds, &chart, 0.0);
        let center = scene.marks[0].center;

        let tip = hover(&scene, &ds, &chart.selection, center).unwrap();
        assert_eq!(tip.lines[0], "Alabama");
        assert_eq!(tip.anchor, center);
    }

    #[test]
    fn hover_over_a_constant_column() {
        let records = (0..50)
            .map(|i| {
                let v = i as f64;
                sample_record(&format!("State {i}"), "ST", [v, 38.0, 40000.0 + v, 10.0, 20.0 + v, 15.0])
            })
            .collect();
        let ds = Dataset::new(records, None);
        let config = ChartConfig { initial_x: Attribute::Age, ..ChartConfig::default() };
        let chart = ChartState::new(&ds, &config).unwrap();
        let scene = build_scene(&ds, &chart, 0.0);
        assert!(scene.marks.iter().all(|m| m.center[0] == scene.marks[0].center[0]));

        let center = scene.marks[7].center;
        let tip = hover(&scene, &ds, &chart.selection, center).unwrap();
        assert_eq!(tip.lines[0], "State 7");
        assert_eq!(tip.lines[1], "Median Age: 38");
    }
}
