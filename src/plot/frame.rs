//! Render model handed to the presentation layer.
//!
//! A [`PlotFrame`] is fully resolved: every position is in display space and
//! every label carries its text and color, so a backend only has to draw
//! primitives. Backends plug in through [`Presenter`].

use serde::Serialize;

use super::hit::HitResult;
use super::scale::{Point, Viewport, MARGIN_LEFT, MARGIN_TOP};
use crate::app::{AnalysisSession, Snapshot};
use crate::error::Result;
use crate::util::color::{
    self, Rgb, AXIS_WHITE, CAPTION_GRAY, HIGHLIGHT_BLUE, INVALID_ORANGE, LINE_PURPLE, PEAK_PINK,
    TICK_GRAY,
};
use crate::util::format::{peak_label, sample_label};

/// Target number of ticks along the period axis.
const TICK_TARGET: usize = 10;

/// Vertical offset of peak labels above their point.
const PEAK_LABEL_LIFT: f64 = 10.0;

/// Horizontal nudge for peak labels that would cross the top margin.
const PEAK_LABEL_NUDGE: f64 = 8.0;

/// Half length of a tick mark across the period axis.
const TICK_HALF_LENGTH: f64 = 3.0;

/// A straight line in display space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
    pub color: Rgb,
}

/// Period axis tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub period: usize,
    pub x: f64,
    /// Label color.
    pub color: Rgb,
    /// Short mark crossing the axis.
    pub mark: Line,
}

/// Text anchored at a display position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
    pub color: Rgb,
    pub font_size: f64,
    pub rotation_deg: f64,
}

impl Label {
    /// Centered "invalid input" banner for a display of this size.
    pub fn invalid_input(viewport: Viewport) -> Self {
        Self::new(
            "invalid input".to_string(),
            Point::new(viewport.width / 2.0 - 30.0, viewport.height / 2.0),
            INVALID_ORANGE,
            32.0,
        )
    }

    fn new(text: String, anchor: Point, color: Rgb, font_size: f64) -> Self {
        Self {
            text,
            anchor,
            color,
            font_size,
            rotation_deg: 0.0,
        }
    }
}

/// Everything needed to draw one state of the plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFrame {
    pub viewport: Viewport,
    pub x_axis: Line,
    pub y_axis: Line,
    pub ticks: Vec<Tick>,
    /// Curve segments between consecutive samples.
    pub segments: Vec<Line>,
    /// Highlighted sample markers.
    pub markers: Vec<Point>,
    /// Detail box for a hovered point.
    pub hover_label: Option<Label>,
    /// Always-on labels for flagged periods.
    pub peak_labels: Vec<Label>,
    /// Axis captions.
    pub captions: Vec<Label>,
}

impl PlotFrame {
    /// Build the frame for `snapshot` with `hit` highlighted.
    pub fn build(snapshot: &Snapshot, hit: HitResult) -> Self {
        let viewport = snapshot.mapper().viewport();
        let points = snapshot.points();
        let samples = snapshot.samples();
        let axis_y = viewport.x_axis_y();

        let x_axis = Line {
            from: Point::new(MARGIN_LEFT, axis_y),
            to: Point::new(viewport.plot_right(), axis_y),
            color: AXIS_WHITE,
        };
        let y_axis = Line {
            from: Point::new(MARGIN_LEFT, axis_y),
            to: Point::new(MARGIN_LEFT, MARGIN_TOP),
            color: AXIS_WHITE,
        };

        let max_period = snapshot.max_period();
        let stride = (max_period / TICK_TARGET).max(1);
        let ticks = (2..max_period)
            .filter(|p| p % stride == 0)
            .enumerate()
            .map(|(n, period)| {
                let x = snapshot.mapper().map_x(period as f64);
                Tick {
                    period,
                    x,
                    color: color::tick_color(n),
                    mark: Line {
                        from: Point::new(x, axis_y - TICK_HALF_LENGTH),
                        to: Point::new(x, axis_y + TICK_HALF_LENGTH),
                        color: TICK_GRAY,
                    },
                }
            })
            .collect();

        let highlighted_segment = match hit {
            HitResult::NearestSegment(i) => Some(i),
            _ => None,
        };
        let segments = points
            .windows(2)
            .enumerate()
            .map(|(i, pair)| Line {
                from: pair[0],
                to: pair[1],
                color: if highlighted_segment == Some(i) {
                    HIGHLIGHT_BLUE
                } else {
                    LINE_PURPLE
                },
            })
            .collect();

        let (markers, hover_label) = match hit {
            HitResult::NearestPoint(i) if i < points.len() => (
                vec![points[i]],
                Some(Label::new(
                    sample_label(&samples[i]),
                    points[i],
                    AXIS_WHITE,
                    12.0,
                )),
            ),
            HitResult::NearestSegment(i) if i + 1 < points.len() => {
                (vec![points[i], points[i + 1]], None)
            }
            _ => (Vec::new(), None),
        };

        let peak_labels = samples
            .iter()
            .zip(points)
            .zip(snapshot.outliers())
            .filter(|&(_, &flagged)| flagged)
            .map(|((sample, &p), _)| {
                let mut anchor = Point::new(p.x, p.y - PEAK_LABEL_LIFT);
                if anchor.y < MARGIN_TOP {
                    anchor = Point::new(p.x - PEAK_LABEL_NUDGE, p.y);
                }
                Label::new(peak_label(sample), anchor, PEAK_PINK, 18.0)
            })
            .collect();

        let captions = vec![
            Label::new(
                "transposition length".to_string(),
                Point::new(viewport.width / 2.0, viewport.height - 5.0),
                CAPTION_GRAY,
                14.0,
            ),
            Label {
                rotation_deg: -90.0,
                ..Label::new(
                    "ioc".to_string(),
                    Point::new(MARGIN_LEFT / 1.5, viewport.height / 2.0 - 5.0),
                    CAPTION_GRAY,
                    14.0,
                )
            },
        ];

        Self {
            viewport,
            x_axis,
            y_axis,
            ticks,
            segments,
            markers,
            hover_label,
            peak_labels,
            captions,
        }
    }
}

/// A rendering backend.
pub trait Presenter {
    /// Erase everything.
    fn clear(&mut self);
    /// Show the "invalid input" indication.
    fn show_invalid_input(&mut self, banner: &Label);
    /// Draw a complete plot.
    fn draw(&mut self, frame: &PlotFrame);
}

/// Push the outcome of the last run to `presenter`.
///
/// Invalid input gets an explicit indication sized to `viewport`; any other
/// failure leaves an empty plot.
pub fn present<P: Presenter + ?Sized>(
    presenter: &mut P,
    session: &AnalysisSession,
    outcome: &Result<()>,
    viewport: Viewport,
    hit: HitResult,
) {
    presenter.clear();
    match outcome {
        Err(err) if err.is_invalid_input() => {
            presenter.show_invalid_input(&Label::invalid_input(viewport));
        }
        Err(_) => {}
        Ok(()) => {
            if let Some(frame) = session.frame(hit) {
                presenter.draw(&frame);
            }
        }
    }
}
