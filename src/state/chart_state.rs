use crate::config::{ChartConfig, ChartLayout, TransitionConfig};
use crate::data::record::{Attribute, Axis, Dataset};
use crate::error::ChartError;
use crate::render::scale::{build_scale, LinearScale, PaddingRule};
use crate::render::transition::{lerp, Transition};

/// The attribute currently shown on each axis.
///
/// Fields are private so that `x` always holds an X attribute and `y` a Y
/// attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSelection {
    x: Attribute,
    y: Attribute,
}

impl AxisSelection {
    pub fn new(x: Attribute, y: Attribute) -> Result<Self, ChartError> {
        for (attribute, axis) in [(x, Axis::X), (y, Axis::Y)] {
            if attribute.axis() != axis {
                return Err(ChartError::WrongAxis { attribute, axis });
            }
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> Attribute {
        self.x
    }

    pub fn y(&self) -> Attribute {
        self.y
    }

    pub fn get(&self, axis: Axis) -> Attribute {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Select `attribute` on its own axis. Returns the replaced attribute, or
    /// `None` when it was already selected.
    pub fn set(&mut self, attribute: Attribute) -> Option<Attribute> {
        let slot = match attribute.axis() {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        };
        if *slot == attribute {
            None
        } else {
            Some(std::mem::replace(slot, attribute))
        }
    }

    /// Whether the label for `attribute` is the active one in its group.
    pub fn is_active(&self, attribute: Attribute) -> bool {
        self.get(attribute.axis()) == attribute
    }
}

impl Default for AxisSelection {
    fn default() -> Self {
        Self { x: Attribute::Income, y: Attribute::Obesity }
    }
}

/// A replaced scale whose ticks are fading out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadingScale {
    pub scale: LinearScale,
    /// Tick opacity when the current animation started.
    pub opacity: f64,
}

/// Fading tick sets below this opacity are dropped.
const MIN_FADE_OPACITY: f64 = 0.01;

/// In-flight animation of one axis after its attribute changed.
#[derive(Debug, Clone)]
pub struct AxisAnimation {
    pub transition: Transition,
    /// Displayed coordinate of every record when the animation started.
    pub from_positions: Vec<f64>,
    /// Scales replaced so far; their ticks fade out.
    pub fading: Vec<FadingScale>,
}

/// All mutable chart state, passed explicitly through the render pipeline.
#[derive(Debug, Clone)]
pub struct ChartState {
    pub selection: AxisSelection,
    x_scale: LinearScale,
    y_scale: LinearScale,
    x_animation: Option<AxisAnimation>,
    y_animation: Option<AxisAnimation>,
    pub layout: ChartLayout,
    pub transition: TransitionConfig,
    x_padding: PaddingRule,
    y_padding: PaddingRule,
}

impl ChartState {
    pub fn new(dataset: &Dataset, config: &ChartConfig) -> Result<Self, ChartError> {
        let selection = AxisSelection::new(config.initial_x, config.initial_y)?;
        Self::with_selection(dataset, config, selection)
    }

    /// Build fresh scales for an existing selection, e.g. after a new dataset was opened.
    pub fn with_selection(
        dataset: &Dataset,
        config: &ChartConfig,
        selection: AxisSelection,
    ) -> Result<Self, ChartError> {
        let layout = config.layout;
        let x_padding = config.padding(Axis::X);
        let y_padding = config.padding(Axis::Y);
        let x_scale = build_scale(dataset, selection.x(), x_padding, layout.range(Axis::X))?;
        let y_scale = build_scale(dataset, selection.y(), y_padding, layout.range(Axis::Y))?;
        Ok(Self {
            selection,
            x_scale,
            y_scale,
            x_animation: None,
            y_animation: None,
            layout,
            transition: config.transition,
            x_padding,
            y_padding,
        })
    }

    pub fn scale(&self, axis: Axis) -> &LinearScale {
        match axis {
            Axis::X => &self.x_scale,
            Axis::Y => &self.y_scale,
        }
    }

    pub fn padding(&self, axis: Axis) -> PaddingRule {
        match axis {
            Axis::X => self.x_padding,
            Axis::Y => self.y_padding,
        }
    }

    pub fn animation(&self, axis: Axis) -> Option<&AxisAnimation> {
        match axis {
            Axis::X => self.x_animation.as_ref(),
            Axis::Y => self.y_animation.as_ref(),
        }
    }

    /// Install a new scale for `axis` and animate from `from_positions`.
    pub(crate) fn replace_scale(
        &mut self,
        axis: Axis,
        scale: LinearScale,
        from_positions: Vec<f64>,
        now: f64,
    ) {
        let transition = Transition::new(
            now,
            self.transition.duration_secs(),
            self.transition.easing,
        );
        let (slot, animation) = match axis {
            Axis::X => (&mut self.x_scale, &mut self.x_animation),
            Axis::Y => (&mut self.y_scale, &mut self.y_animation),
        };
        let previous_scale = std::mem::replace(slot, scale);

        // Restarting mid-flight keeps every tick set still on screen fading
        // from its displayed opacity.
        let fading = match animation.take() {
            Some(running) if !running.transition.is_finished(now) => {
                let t = running.transition.progress(now);
                let mut fading: Vec<FadingScale> = running
                    .fading
                    .into_iter()
                    .map(|f| FadingScale { scale: f.scale, opacity: f.opacity * (1.0 - t) })
                    .collect();
                fading.push(FadingScale { scale: previous_scale, opacity: t });
                fading.retain(|f| f.opacity > MIN_FADE_OPACITY);
                fading
            }
            _ => vec![FadingScale { scale: previous_scale, opacity: 1.0 }],
        };
        *animation = Some(AxisAnimation { transition, from_positions, fading });
    }

    /// Displayed coordinate of one record on `axis` at time `now`.
    pub fn position(&self, dataset: &Dataset, index: usize, axis: Axis, now: f64) -> f64 {
        let Some(record) = dataset.get(index) else {
            return f64::NAN;
        };
        let target = self.scale(axis).apply(record.value(self.selection.get(axis)));

        match self.animation(axis) {
            Some(anim) if !anim.transition.is_finished(now) => {
                let from = anim.from_positions.get(index).copied().unwrap_or(f64::NAN);
                if from.is_finite() && target.is_finite() {
                    lerp(from, target, anim.transition.progress(now))
                } else {
                    target
                }
            }
            _ => target,
        }
    }

    /// Displayed coordinates of every record on `axis`.
    pub fn positions(&self, dataset: &Dataset, axis: Axis, now: f64) -> Vec<f64> {
        (0..dataset.len())
            .map(|i| self.position(dataset, i, axis, now))
            .collect()
    }

    pub fn is_settled(&self, now: f64) -> bool {
        [Axis::X, Axis::Y].iter().all(|&axis| {
            self.animation(axis)
                .map_or(true, |anim| anim.transition.is_finished(now))
        })
    }

    /// Drop animations that have completed. Returns `true` once nothing is moving.
    pub fn tick(&mut self, now: f64) -> bool {
        for animation in [&mut self.x_animation, &mut self.y_animation] {
            if animation.as_ref().is_some_and(|a| a.transition.is_finished(now)) {
                *animation = None;
            }
        }
        self.x_animation.is_none() && self.y_animation.is_none()
    }

    /// Jump every running animation to its end state.
    pub fn finish_transitions(&mut self) {
        self.x_animation = None;
        self.y_animation = None;
    }
}
