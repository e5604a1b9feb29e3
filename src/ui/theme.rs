use windows::Win32::Foundation::COLORREF;

// ── Color palette (dark) ─────────────────────────────────────────────────────

/// Background: #030711
pub const CLR_BACKGROUND: COLORREF = COLORREF(0x00110703);

/// Foreground / primary text: #F8FAFC
pub const CLR_FOREGROUND: COLORREF = COLORREF(0x00FCFAF8);

/// Secondary / card borders: #1E293B
pub const CLR_SECONDARY: COLORREF = COLORREF(0x003B291E);

/// Muted foreground (descriptions, labels): #94A3B8
pub const CLR_MUTED_FG: COLORREF = COLORREF(0x00B8A394);

/// Accent: #0EA5E9
pub const CLR_BRAND: COLORREF = COLORREF(0x00E9A50E);

/// Accent while pressed: #0369A1
pub const CLR_BRAND_DARK: COLORREF = COLORREF(0x00A16903);

pub const CLR_BORDER: COLORREF = CLR_SECONDARY;

// ── Dimensions ───────────────────────────────────────────────────────────────

/// Control window client area dimensions
pub const WINDOW_WIDTH: i32 = 340;
pub const WINDOW_HEIGHT: i32 = 260;

pub const PADDING: i32 = 20;

/// Content width (WINDOW_WIDTH - 2 * PADDING)
pub const CONTENT_WIDTH: i32 = WINDOW_WIDTH - 2 * PADDING;

pub const CARD_RADIUS: i32 = 8;

pub const BUTTON_HEIGHT: i32 = 36;

pub const GAP: i32 = 12;

// ── Font sizes (in logical units, negative for character height) ─────────────

pub const FONT_SIZE_TITLE: i32 = -18;
pub const FONT_SIZE_SMALL: i32 = -12;
pub const FONT_SIZE_XS: i32 = -11;

pub const FONT_NAME: &str = "Segoe UI";
