//! Retained visual tree of the chart.
//!
//! `build_scene` is a pure function of the dataset, chart state and clock.
//! The egui panel paints the result every frame and the SVG exporter
//! serializes it. All coordinates are relative to the inner plot area.

use crate::data::record::{Attribute, Axis, Dataset};
use crate::render::scale::{format_tick_value, LinearScale};
use crate::state::chart_state::ChartState;

/// A circle mark and its abbreviation text.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    /// Index of the record in the dataset.
    pub index: usize,
    pub center: [f64; 2],
    pub radius: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Pixel offset along the axis.
    pub position: f64,
    pub label: String,
    pub opacity: f64,
}

/// A clickable attribute label beside an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub attribute: Attribute,
    pub text: &'static str,
    /// Centre of the text. Y labels are drawn rotated by -90 degrees around it.
    pub anchor: [f64; 2],
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub marks: Vec<Mark>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub x_labels: Vec<AxisLabel>,
    pub y_labels: Vec<AxisLabel>,
    /// No transition is running; the scene will not change until the next click.
    pub settled: bool,
}

impl Scene {
    pub fn mark_for_record(&self, index: usize) -> Option<&Mark> {
        self.marks.iter().find(|m| m.index == index)
    }
}

/// Vertical distance between stacked axis labels.
const LABEL_SPACING: f64 = 20.0;

pub fn build_scene(dataset: &Dataset, chart: &ChartState, now: f64) -> Scene {
    let layout = chart.layout;
    let width = layout.width();
    let height = layout.height();

    let xs = chart.positions(dataset, Axis::X, now);
    let ys = chart.positions(dataset, Axis::Y, now);
    let marks = dataset
        .records()
        .iter()
        .zip(xs.into_iter().zip(ys))
        .enumerate()
        .filter(|(_, (_, (x, y)))| x.is_finite() && y.is_finite())
        .map(|(index, (record, (x, y)))| Mark {
            index,
            center: [x, y],
            radius: layout.mark_radius,
            text: record.abbr.clone(),
        })
        .collect();

    let x_labels = Axis::X
        .attributes()
        .iter()
        .enumerate()
        .map(|(i, &attribute)| AxisLabel {
            attribute,
            text: attribute.axis_label(),
            anchor: [width / 2.0, height + 40.0 + LABEL_SPACING * i as f64],
            active: chart.selection.is_active(attribute),
        })
        .collect();

    let y_labels = Axis::Y
        .attributes()
        .iter()
        .enumerate()
        .map(|(i, &attribute)| AxisLabel {
            attribute,
            text: attribute.axis_label(),
            anchor: [
                -layout.margin.left + LABEL_SPACING * (i as f64 + 1.0),
                height / 2.0,
            ],
            active: chart.selection.is_active(attribute),
        })
        .collect();

    Scene {
        width,
        height,
        marks,
        x_ticks: axis_ticks(chart, Axis::X, now),
        y_ticks: axis_ticks(chart, Axis::Y, now),
        x_labels,
        y_labels,
        settled: chart.is_settled(now),
    }
}

/// Ticks of the current scale, plus fading ticks of the previous scale while
/// the axis animates.
fn axis_ticks(chart: &ChartState, axis: Axis, now: f64) -> Vec<Tick> {
    let count = chart.layout.tick_count;
    let (r0, r1) = chart.layout.range(axis);
    let (lo, hi) = (r0.min(r1), r0.max(r1));

    let collect = |scale: &LinearScale, opacity: f64| -> Vec<Tick> {
        scale
            .ticks(count)
            .into_iter()
            .map(|value| Tick {
                position: scale.apply(value),
                label: format_tick_value(value),
                opacity,
            })
            .filter(|t| t.position >= lo - 0.5 && t.position <= hi + 0.5)
            .collect()
    };

    match chart.animation(axis) {
        Some(anim) if !anim.transition.is_finished(now) => {
            let t = anim.transition.progress(now);
            let mut ticks: Vec<Tick> = anim
                .fading
                .iter()
                .flat_map(|f| collect(&f.scale, f.opacity * (1.0 - t)))
                .collect();
            ticks.extend(collect(chart.scale(axis), t));
            ticks.retain(|tick| tick.opacity > 0.0);
            ticks
        }
        _ => collect(chart.scale(axis), 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::record::sample_record;
    use crate::state::interaction::handle_label_click;
    use approx::assert_relative_eq;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                sample_record("Alpha", "AA", [10.0, 30.0, 30000.0, 8.0, 20.0, 15.0]),
                sample_record("Beta", "BB", [15.0, 40.0, 60000.0, 12.0, 30.0, 25.0]),
                sample_record("Gamma", "GG", [f64::NAN, 35.0, 45000.0, 10.0, 25.0, 20.0]),
            ],
            None,
        )
    }

    #[test]
    fn first_paint_is_settled_with_one_mark_per_record() {
        let ds = dataset();
        let chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        let scene = build_scene(&ds, &chart, 0.0);
        assert!(scene.settled);
        assert_eq!(scene.marks.len(), 3);
        assert_eq!(scene.marks[1].text, "BB");
        assert_relative_eq!(scene.marks[0].radius, 15.0);
        assert!(scene.marks[0].center[0] < scene.marks[1].center[0]);
        assert!(scene.x_ticks.iter().all(|t| t.opacity == 1.0));
        assert!(!scene.y_ticks.is_empty());
    }

    #[test]
    fn labels_mark_the_selection_active() {
        let ds = dataset();
        let chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        let scene = build_scene(&ds, &chart, 0.0);
        let active: Vec<Attribute> = scene
            .x_labels
            .iter()
            .chain(&scene.y_labels)
            .filter(|l| l.active)
            .map(|l| l.attribute)
            .collect();
        assert_eq!(active, vec![Attribute::Income, Attribute::Obesity]);
        assert_eq!(scene.x_labels[0].text, "Poverty Rate (%)");
        assert!(scene.y_labels[0].anchor[0] < 0.0);
    }

    #[test]
    fn records_with_malformed_values_are_not_drawn() {
        let ds = dataset();
        let mut chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        handle_label_click(&mut chart, &ds, Attribute::Poverty, 0.0).unwrap();
        let scene = build_scene(&ds, &chart, 2.0);
        assert_eq!(scene.marks.len(), 2);
        assert!(scene.mark_for_record(2).is_none());
    }

    #[test]
    fn transition_moves_marks_and_crossfades_ticks() {
        let ds = dataset();
        let mut chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        let before = build_scene(&ds, &chart, 0.0);

        handle_label_click(&mut chart, &ds, Attribute::Age, 1.0).unwrap();
        let mid = build_scene(&ds, &chart, 1.5);
        let after = build_scene(&ds, &chart, 2.0);

        assert!(!mid.settled);
        assert!(after.settled);
        for i in 0..3 {
            let (a, m, b) = (
                before.marks[i].center[0],
                mid.marks[i].center[0],
                after.marks[i].center[0],
            );
            assert!(m >= a.min(b) - 1e-9 && m <= a.max(b) + 1e-9);
            assert_relative_eq!(before.marks[i].center[1], after.marks[i].center[1]);
        }
        assert!(mid.x_ticks.iter().any(|t| t.opacity < 1.0));
        assert!(after.x_ticks.iter().all(|t| t.opacity == 1.0));
        assert_eq!(after.y_ticks, before.y_ticks);
    }

    #[test]
    fn restart_keeps_outgoing_ticks_fading() {
        let ds = dataset();
        let mut chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        handle_label_click(&mut chart, &ds, Attribute::Age, 0.0).unwrap();
        handle_label_click(&mut chart, &ds, Attribute::Poverty, 0.5).unwrap();

        let income_tick = |scene: &Scene| {
            scene
                .x_ticks
                .iter()
                .find(|t| t.label == "25000")
                .map(|t| t.opacity)
        };

        let just_after = build_scene(&ds, &chart, 0.6);
        let opacity = income_tick(&just_after).unwrap();
        assert!(opacity > 0.4 && opacity < 0.5, "{opacity}");
        assert!(just_after.x_ticks.iter().any(|t| t.label == "30"));

        let later = build_scene(&ds, &chart, 1.2);
        assert!(income_tick(&later).unwrap() < opacity);
        assert!(income_tick(&build_scene(&ds, &chart, 1.5)).is_none());
    }

    #[test]
    fn ticks_stay_inside_the_plot_area() {
        let ds = dataset();
        let chart = ChartState::new(&ds, &ChartConfig::default()).unwrap();
        let scene = build_scene(&ds, &chart, 0.0);
        for t in &scene.x_ticks {
            assert!(t.position >= -0.5 && t.position <= scene.width + 0.5);
        }
        for t in &scene.y_ticks {
            assert!(t.position >= -0.5 && t.position <= scene.height + 0.5);
        }
    }
}
