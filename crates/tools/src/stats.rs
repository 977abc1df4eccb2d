use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Which readout the overlay shows. Clicking the overlay cycles through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsMode {
    #[default]
    Fps,
    Ms,
}

impl StatsMode {
    fn next(self) -> Self {
        match self {
            Self::Fps => Self::Ms,
            Self::Ms => Self::Fps,
        }
    }
}

/// Screen corner the overlay sticks to, with an inset in logical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsAnchor {
    TopLeft([f32; 2]),
    BottomRight([f32; 2]),
}

impl Default for StatsAnchor {
    fn default() -> Self {
        Self::BottomRight([0.0, 0.0])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Range {
    value: f64,
    min: f64,
    max: f64,
    seen: bool,
}

impl Range {
    fn record(&mut self, value: f64) {
        if self.seen {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        } else {
            self.min = value;
            self.max = value;
            self.seen = true;
        }
        self.value = value;
    }
}

/// Frame-rate overlay.
///
/// Frame time is measured from `begin` to `end`; calling only [`FrameStats::update`]
/// each frame measures the time between frames. FPS is the number of frames
/// completed in each window of at least one second.
#[derive(Debug, Clone)]
pub struct FrameStats {
    pub anchor: StatsAnchor,
    mode: StatsMode,
    attached: bool,
    begin: Option<Instant>,
    window_start: Option<Instant>,
    frames: u32,
    fps: Range,
    ms: Range,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            anchor: StatsAnchor::default(),
            mode: StatsMode::default(),
            attached: false,
            begin: None,
            window_start: None,
            frames: 0,
            fps: Range::default(),
            ms: Range::default(),
        }
    }

    /// Show the overlay. Detached stats keep counting but draw nothing.
    pub fn attach(&mut self, anchor: StatsAnchor) {
        self.anchor = anchor;
        self.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn mode(&self) -> StatsMode {
        self.mode
    }

    pub fn begin(&mut self) {
        self.begin_at(Instant::now());
    }

    pub fn begin_at(&mut self, now: Instant) {
        self.begin = Some(now);
        self.window_start.get_or_insert(now);
    }

    pub fn end(&mut self) -> Instant {
        self.end_at(Instant::now())
    }

    /// Close the current frame and fold it into the counters.
    pub fn end_at(&mut self, now: Instant) -> Instant {
        self.frames += 1;
        if let Some(begin) = self.begin {
            self.ms
                .record(now.saturating_duration_since(begin).as_secs_f64() * 1000.0);
        }
        let start = *self.window_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= WINDOW {
            self.fps
                .record(f64::from(self.frames) / elapsed.as_secs_f64());
            self.window_start = Some(now);
            self.frames = 0;
        }
        now
    }

    /// End the current frame and begin the next one.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub fn update_at(&mut self, now: Instant) {
        let end = self.end_at(now);
        self.begin_at(end);
    }

    /// Frames per second of the last completed window.
    pub fn fps(&self) -> Option<f64> {
        self.fps.seen.then_some(self.fps.value)
    }

    /// Duration of the last frame in milliseconds.
    pub fn frame_ms(&self) -> Option<f64> {
        self.ms.seen.then_some(self.ms.value)
    }

    pub fn fps_range(&self) -> Option<(f64, f64)> {
        self.fps.seen.then_some((self.fps.min, self.fps.max))
    }

    pub fn ms_range(&self) -> Option<(f64, f64)> {
        self.ms.seen.then_some((self.ms.min, self.ms.max))
    }

    /// Text of the current readout, e.g. `60 FPS (58-61)`.
    pub fn label(&self) -> String {
        let (unit, range) = match self.mode {
            StatsMode::Fps => ("FPS", &self.fps),
            StatsMode::Ms => ("MS", &self.ms),
        };
        if range.seen {
            format!(
                "{:.0} {unit} ({:.0}-{:.0})",
                range.value, range.min, range.max
            )
        } else {
            format!("- {unit}")
        }
    }

    /// Draw the overlay. Returns true when it was clicked this frame; a click
    /// also switches to the next readout.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        if !self.attached {
            return false;
        }
        let area = egui::Area::new(egui::Id::new("frame_stats")).order(egui::Order::Foreground);
        let area = match self.anchor {
            StatsAnchor::TopLeft([x, y]) => area.anchor(egui::Align2::LEFT_TOP, [x, y]),
            StatsAnchor::BottomRight([x, y]) => area.anchor(egui::Align2::RIGHT_BOTTOM, [-x, -y]),
        };
        let label = self.label();
        let clicked = area
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(0, 0, 34))
                    .inner_margin(egui::Margin::same(4))
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(label)
                                    .monospace()
                                    .color(egui::Color32::from_rgb(0, 255, 255)),
                            )
                            .sense(egui::Sense::click()),
                        )
                        .clicked()
                    })
                    .inner
            })
            .inner;
        if clicked {
            self.mode = self.mode.next();
        }
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_after_one_second_window() {
        let t0 = Instant::now();
        let mut stats = FrameStats::new();
        stats.begin_at(t0);
        for i in 1..=60 {
            stats.update_at(t0 + Duration::from_millis(i * 1000 / 60));
        }
        let fps = stats.fps().unwrap();
        assert!((fps - 60.0).abs() < 0.5, "{fps}");
        let ms = stats.frame_ms().unwrap();
        assert!((ms - 16.67).abs() < 1.0, "{ms}");
    }

    #[test]
    fn no_fps_before_window_closes() {
        let t0 = Instant::now();
        let mut stats = FrameStats::new();
        stats.begin_at(t0);
        stats.update_at(t0 + Duration::from_millis(500));
        assert!(stats.fps().is_none());
        assert_eq!(stats.frame_ms(), Some(500.0));
        assert_eq!(stats.label(), "- FPS");
    }

    #[test]
    fn tracks_min_and_max_frame_time() {
        let t0 = Instant::now();
        let mut stats = FrameStats::new();
        stats.begin_at(t0);
        stats.update_at(t0 + Duration::from_millis(10));
        stats.update_at(t0 + Duration::from_millis(40));
        stats.update_at(t0 + Duration::from_millis(60));
        let (min, max) = stats.ms_range().unwrap();
        assert!((min - 10.0).abs() < 1e-6);
        assert!((max - 30.0).abs() < 1e-6);
    }

    #[test]
    fn detached_overlay_draws_nothing() {
        let mut stats = FrameStats::new();
        let ctx = egui::Context::default();
        let mut clicked = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            clicked = stats.show(ctx);
        });
        assert!(!clicked);
        assert_eq!(stats.mode(), StatsMode::Fps);
    }

    #[test]
    fn attach_sets_anchor() {
        let mut stats = FrameStats::new();
        stats.attach(StatsAnchor::BottomRight([0.0, 0.0]));
        assert!(stats.is_attached());
        assert_eq!(stats.anchor, StatsAnchor::BottomRight([0.0, 0.0]));
    }
}
