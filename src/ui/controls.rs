// UI control state tracking and hit-testing

use windows::Win32::Foundation::RECT;

/// State for the "Show clock" button
#[derive(Debug, Clone)]
pub struct ButtonState {
    pub rect: RECT,
    pub hover: bool,
    pub pressed: bool,
    pub text: String,
}

impl ButtonState {
    pub fn new(text: &str) -> Self {
        Self {
            rect: RECT::default(),
            hover: false,
            pressed: false,
            text: text.to_string(),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        point_in_rect(x, y, &self.rect)
    }
}

/// Complete UI state
pub struct UiState {
    pub show_button: ButtonState,
    /// Overlay count as of the last paint
    pub live_overlays: usize,
    pub fade_ms: u64,
    pub live_hands: bool,

    pub toast_message: String,
    pub toast_visible: bool,
}

impl UiState {
    pub fn new(fade_ms: u64, live_hands: bool) -> Self {
        Self {
            show_button: ButtonState::new("Show clock"),
            live_overlays: 0,
            fade_ms,
            live_hands,
            toast_message: String::new(),
            toast_visible: false,
        }
    }

    pub fn status_text(&self) -> String {
        match self.live_overlays {
            0 => "No clock on screen".into(),
            1 => "1 clock fading out".into(),
            n => format!("{n} clocks fading out"),
        }
    }

    pub fn description(&self) -> String {
        let hands = if self.live_hands { "ticking" } else { "frozen" };
        format!(
            "Shows a click-through clock ({hands} hands) that fades away over {:.1}s.",
            self.fade_ms as f64 / 1000.0
        )
    }
}

/// Check if a point is inside a rect
pub fn point_in_rect(x: i32, y: i32, r: &RECT) -> bool {
    x >= r.left && x < r.right && y >= r.top && y < r.bottom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_hit_test_is_half_open() {
        let r = RECT {
            left: 10,
            top: 10,
            right: 20,
            bottom: 20,
        };
        assert!(point_in_rect(10, 10, &r));
        assert!(point_in_rect(19, 19, &r));
        assert!(!point_in_rect(20, 15, &r));
        assert!(!point_in_rect(15, 9, &r));
    }

    #[test]
    fn status_counts_overlays() {
        let mut ui = UiState::new(3000, true);
        assert_eq!(ui.status_text(), "No clock on screen");
        ui.live_overlays = 1;
        assert_eq!(ui.status_text(), "1 clock fading out");
        ui.live_overlays = 3;
        assert_eq!(ui.status_text(), "3 clocks fading out");
    }

    #[test]
    fn description_mentions_fade_length() {
        let ui = UiState::new(2500, false);
        let text = ui.description();
        assert!(text.contains("2.5s"));
        assert!(text.contains("frozen"));
    }
}
