use deck_core::{ChartHandle, Frame, RenderSink};
use serde::Serialize;
use std::io::Write;
use tracing::warn;

/// Writes one JSON object per frame (JSON Lines), for piping into another
/// process that does the actual drawing.
///
/// Each line looks like `{"handle":3,"frame":{"kind":"line",...}}`.
pub struct JsonSink<W> {
    out: W,
}

#[derive(Serialize)]
struct Record<'a> {
    handle: ChartHandle,
    frame:  &'a Frame,
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RenderSink for JsonSink<W> {
    fn present(&mut self, handle: ChartHandle, frame: &Frame) {
        let record = Record { handle, frame };
        let written = serde_json::to_writer(&mut self.out, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!(%handle, "json sink write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Axis, LineFrame, Point, ValueRange};
    use serde_json::Value;

    #[test]
    fn one_line_per_frame() {
        let axis = Axis {
            label: Some("Value".into()),
            range: ValueRange::new(0.0, 1.5).unwrap(),
            ticks: vec![0.5, 1.0, 1.5],
            grid:  true,
        };
        let frame = Frame::Line(LineFrame {
            title:  Some("Camera FPS".into()),
            x_axis: axis.clone(),
            y_axis: axis,
            points: vec![Point { x: 0.0, y: 0.25 }],
        });

        let mut sink = JsonSink::new(Vec::new());
        sink.present(ChartHandle::new(3), &frame);
        sink.present(ChartHandle::new(4), &frame);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<Value> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["handle"], 3);
        assert_eq!(lines[0]["frame"]["kind"], "line");
        assert_eq!(lines[1]["frame"]["title"], "Camera FPS");
        assert_eq!(lines[1]["frame"]["y_axis"]["range"][1], 1.5);
    }
}
