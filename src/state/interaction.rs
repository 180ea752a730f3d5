use crate::data::record::{Attribute, Axis, Dataset};
use crate::error::ChartError;
use crate::render::scale::build_scale;
use crate::state::chart_state::ChartState;

/// Outcome of clicking an axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelClick {
    /// The label was already active; nothing changed.
    Unchanged,
    Changed { axis: Axis, from: Attribute, to: Attribute },
}

/// Switch the axis that owns `attribute` to it.
///
/// Rebuilds that axis's scale and starts its transition from the positions
/// displayed at `now`. The other axis is left untouched. If the scale cannot
/// be built the state is not modified.
pub fn handle_label_click(
    chart: &mut ChartState,
    dataset: &Dataset,
    attribute: Attribute,
    now: f64,
) -> Result<LabelClick, ChartError> {
    let axis = attribute.axis();
    let current = chart.selection.get(axis);
    if current == attribute {
        tracing::debug!(%attribute, "Label already active");
        return Ok(LabelClick::Unchanged);
    }

    let scale = build_scale(dataset, attribute, chart.padding(axis), chart.layout.range(axis))?;
    let from_positions = chart.positions(dataset, axis, now);

    chart.selection.set(attribute);
    chart.replace_scale(axis, scale, from_positions, now);

    tracing::info!("{axis} axis: {current} -> {attribute}");
    Ok(LabelClick::Changed { axis, from: current, to: attribute })
}
