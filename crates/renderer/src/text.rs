//! Plain-text drawing of frames, for terminals and logs.

use deck_core::{BarFrame, ChartHandle, Frame, LineFrame, RadarFrame, RenderSink, ValueRange};
use std::fmt::Write as _;
use std::io::Write;
use tracing::warn;

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Columns used by a bar at the axis maximum.
const BAR_WIDTH: usize = 32;

/// Render a frame as a few lines of text.
///
/// Line charts become a sparkline scaled to the y axis, bar charts a row of
/// blocks per category (`▸` marks a clipped bar), radar charts a table of
/// spokes with angle and radius.
pub fn render_text(frame: &Frame) -> String {
    match frame {
        Frame::Line(f)  => line(f),
        Frame::Bar(f)   => bar(f),
        Frame::Radar(f) => radar(f),
    }
}

fn line(f: &LineFrame) -> String {
    let heading = f
        .title
        .as_deref()
        .or(f.y_axis.label.as_deref())
        .unwrap_or("series");
    let range = f.y_axis.range;

    let spark: String = f.points.iter().map(|p| spark(range, p.y)).collect();
    let last = f.points.last().map_or(f64::NAN, |p| p.y);

    format!(
        "{heading} [{:.2} .. {:.2}] last {last:.3}\n{spark}\n",
        range.min(),
        range.max()
    )
}

fn spark(range: ValueRange, value: f64) -> char {
    if !value.is_finite() {
        return ' ';
    }
    let span = range.max() - range.min();
    let level = ((range.clamp(value) - range.min()) / span * (SPARKS.len() - 1) as f64).round();
    SPARKS[level as usize]
}

fn bar(f: &BarFrame) -> String {
    let width = f.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let range = f.value_axis.range;
    let span = range.max() - range.min();

    let mut out = format!("{} [{:.0} .. {:.0}]\n", f.title, range.min(), range.max());
    for b in &f.bars {
        let cells = ((b.length - range.min()) / span * BAR_WIDTH as f64).round() as usize;
        let marker = if b.clipped { "▸" } else { "" };
        let _ = writeln!(
            out,
            "{:<width$} │{}{marker} {}",
            b.label,
            "█".repeat(cells),
            b.value
        );
    }
    out
}

fn radar(f: &RadarFrame) -> String {
    let width = f.axes.iter().map(|a| a.label.chars().count()).max().unwrap_or(0);

    let mut out = format!("{} [0 .. {}]\n", f.title, f.radial_max);
    for (axis, vertex) in f.axes.iter().zip(&f.polygon) {
        let _ = writeln!(
            out,
            "{:<width$} {:>6.1}° {:.1}",
            axis.label,
            axis.angle.to_degrees(),
            vertex.radius
        );
    }
    out
}

/// Writes every presented frame as text to `W`, e.g. stdout.
pub struct TextSink<W> {
    out: W,
}

impl<W: Write + Send> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RenderSink for TextSink<W> {
    fn present(&mut self, handle: ChartHandle, frame: &Frame) {
        let text = render_text(frame);
        if let Err(e) = write!(self.out, "{handle} {text}").and_then(|()| self.out.flush()) {
            warn!(%handle, "text sink write failed: {e}");
        }
    }
}
