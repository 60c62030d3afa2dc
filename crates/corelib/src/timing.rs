//! Frame timing: rolling one-second FPS counter.

/// Counts frames and reports them once per accumulated second.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpsCounter {
    elapsed: f32,
    frames: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one frame that took `dt` seconds. Returns the frame count of
    /// the window that just closed, if any. The overshoot past one second is
    /// carried into the next window.
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed >= 1.0 {
            self.elapsed -= 1.0;
            let fps = self.frames;
            self.frames = 0;
            Some(fps)
        } else {
            None
        }
    }
}

/// Window title shown while running.
pub fn fps_title(fps: u32) -> String {
    format!("FPS: {fps}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let mut c = FpsCounter::new();
        let reports: Vec<u32> = (0..130).filter_map(|_| c.tick(0.025)).collect();
        // 130 frames * 25ms = 3.25s
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|&f| (39..=41).contains(&f)));
    }

    #[test]
    fn carries_overshoot() {
        let mut c = FpsCounter::new();
        assert_eq!(c.tick(0.75), None);
        assert_eq!(c.tick(0.5), Some(2));
        // 0.25 carried over
        assert_eq!(c.tick(0.5), None);
        assert_eq!(c.tick(0.25), Some(2));
    }

    #[test]
    fn title_format() {
        assert_eq!(fps_title(60), "FPS: 60");
    }
}
