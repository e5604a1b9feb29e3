// GDI owner-draw rendering of the control window

use super::controls::*;
use super::theme::*;
use windows::Win32::Foundation::{COLORREF, RECT};
use windows::Win32::Graphics::Gdi::*;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn create_font(size: i32, weight: i32, family: &str) -> HFONT {
    let face: Vec<u16> = family.encode_utf16().chain(std::iter::once(0)).collect();
    unsafe {
        let mut lf = LOGFONTW {
            lfHeight: size,
            lfWeight: weight,
            lfQuality: CLEARTYPE_QUALITY,
            lfCharSet: DEFAULT_CHARSET,
            ..Default::default()
        };
        let len = face.len().min(32);
        lf.lfFaceName[..len].copy_from_slice(&face[..len]);
        CreateFontIndirectW(&lf)
    }
}

fn fill_rect_color(hdc: HDC, r: &RECT, color: COLORREF) {
    unsafe {
        let brush = CreateSolidBrush(color);
        FillRect(hdc, r, brush);
        let _ = DeleteObject(HGDIOBJ::from(brush));
    }
}

fn draw_rounded_rect(hdc: HDC, r: &RECT, radius: i32, fill: COLORREF, border: COLORREF) {
    unsafe {
        let fill_brush = CreateSolidBrush(fill);
        let border_pen = CreatePen(PS_SOLID, 1, border);
        let old_brush = SelectObject(hdc, HGDIOBJ::from(fill_brush));
        let old_pen = SelectObject(hdc, HGDIOBJ::from(border_pen));
        let _ = RoundRect(hdc, r.left, r.top, r.right, r.bottom, radius, radius);
        SelectObject(hdc, old_pen);
        SelectObject(hdc, old_brush);
        let _ = DeleteObject(HGDIOBJ::from(fill_brush));
        let _ = DeleteObject(HGDIOBJ::from(border_pen));
    }
}

fn draw_text_simple(hdc: HDC, text: &str, x: i32, y: i32, color: COLORREF, font: HFONT) {
    unsafe {
        let old_font = SelectObject(hdc, HGDIOBJ::from(font));
        SetTextColor(hdc, color);
        SetBkMode(hdc, TRANSPARENT);
        let wide: Vec<u16> = text.encode_utf16().collect();
        let _ = TextOutW(hdc, x, y, &wide);
        SelectObject(hdc, old_font);
    }
}

/// Word-wrapped text inside `r`. Returns the height used.
fn draw_text_wrapped(hdc: HDC, text: &str, r: &RECT, color: COLORREF, font: HFONT) -> i32 {
    unsafe {
        let old_font = SelectObject(hdc, HGDIOBJ::from(font));
        SetTextColor(hdc, color);
        SetBkMode(hdc, TRANSPARENT);
        let mut wide: Vec<u16> = text.encode_utf16().collect();
        let mut rect = *r;
        let height = DrawTextW(hdc, &mut wide, &mut rect, DT_LEFT | DT_WORDBREAK);
        SelectObject(hdc, old_font);
        height
    }
}

fn measure_text(hdc: HDC, text: &str, font: HFONT) -> (i32, i32) {
    unsafe {
        let old_font = SelectObject(hdc, HGDIOBJ::from(font));
        let wide: Vec<u16> = text.encode_utf16().collect();
        let mut size = windows::Win32::Foundation::SIZE::default();
        let _ = GetTextExtentPoint32W(hdc, &wide, &mut size);
        SelectObject(hdc, old_font);
        (size.cx, size.cy)
    }
}

fn draw_line(hdc: HDC, x0: i32, y0: i32, x1: i32, y1: i32, width: i32, color: COLORREF) {
    unsafe {
        let pen = CreatePen(PS_SOLID, width, color);
        let old_pen = SelectObject(hdc, HGDIOBJ::from(pen));
        let _ = MoveToEx(hdc, x0, y0, None);
        let _ = LineTo(hdc, x1, y1);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(HGDIOBJ::from(pen));
    }
}

// ── Main paint function ─────────────────────────────────────────────────────

pub fn paint(hdc: HDC, client: &RECT, state: &mut UiState) {
    fill_rect_color(hdc, client, CLR_BACKGROUND);

    let fonts = Fonts::create();
    let mut y = PADDING;

    y = draw_header(hdc, y, &fonts);
    y += GAP;
    draw_card(hdc, y, state, &fonts);

    if state.toast_visible {
        draw_toast(hdc, client, state, &fonts);
    }

    fonts.destroy();
}

// ── Font cache ──────────────────────────────────────────────────────────────

struct Fonts {
    title: HFONT,
    small: HFONT,
    small_bold: HFONT,
    xs: HFONT,
}

impl Fonts {
    fn create() -> Self {
        Self {
            title: create_font(FONT_SIZE_TITLE, 600, FONT_NAME),
            small: create_font(FONT_SIZE_SMALL, 400, FONT_NAME),
            small_bold: create_font(FONT_SIZE_SMALL, 600, FONT_NAME),
            xs: create_font(FONT_SIZE_XS, 400, FONT_NAME),
        }
    }

    fn destroy(&self) {
        unsafe {
            let _ = DeleteObject(HGDIOBJ::from(self.title));
            let _ = DeleteObject(HGDIOBJ::from(self.small));
            let _ = DeleteObject(HGDIOBJ::from(self.small_bold));
            let _ = DeleteObject(HGDIOBJ::from(self.xs));
        }
    }
}

// ── Section renderers ───────────────────────────────────────────────────────

fn draw_header(hdc: HDC, y: i32, fonts: &Fonts) -> i32 {
    let x = PADDING;
    let right = PADDING + CONTENT_WIDTH;

    // Clock glyph
    let icon_size = 36;
    let cx = x + icon_size / 2;
    let cy = y + icon_size / 2;
    unsafe {
        let pen = CreatePen(PS_SOLID, 2, CLR_BRAND);
        let null_brush = GetStockObject(NULL_BRUSH);
        let old_pen = SelectObject(hdc, HGDIOBJ::from(pen));
        let old_brush = SelectObject(hdc, null_brush);
        let _ = Ellipse(hdc, x + 2, y + 2, x + icon_size - 2, y + icon_size - 2);
        SelectObject(hdc, old_brush);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(HGDIOBJ::from(pen));
    }
    draw_line(hdc, cx, cy, cx, cy - 11, 2, CLR_BRAND);
    draw_line(hdc, cx, cy, cx + 7, cy, 2, CLR_BRAND);

    let text_x = x + icon_size + 12;
    draw_text_simple(hdc, "Clockveil", text_x, y, CLR_FOREGROUND, fonts.title);
    draw_text_simple(
        hdc,
        "Click-through clock overlay",
        text_x,
        y + 20,
        CLR_MUTED_FG,
        fonts.xs,
    );

    let header_bottom = y + icon_size + 8;
    draw_line(hdc, PADDING, header_bottom, right, header_bottom, 1, CLR_BORDER);

    header_bottom + 4
}

fn draw_card(hdc: HDC, y: i32, state: &mut UiState, fonts: &Fonts) {
    let x = PADDING;
    let inner_x = x + 16;
    let inner_right = x + CONTENT_WIDTH - 16;

    let card = RECT {
        left: x,
        top: y,
        right: x + CONTENT_WIDTH,
        bottom: y + 150,
    };
    draw_rounded_rect(hdc, &card, CARD_RADIUS, CLR_BACKGROUND, CLR_BORDER);

    let text_rect = RECT {
        left: inner_x,
        top: y + 14,
        right: inner_right,
        bottom: y + 60,
    };
    let used = draw_text_wrapped(hdc, &state.description(), &text_rect, CLR_MUTED_FG, fonts.small);

    // Button
    let btn_y = y + 14 + used.max(16) + GAP;
    let btn_rect = RECT {
        left: inner_x,
        top: btn_y,
        right: inner_right,
        bottom: btn_y + BUTTON_HEIGHT,
    };
    let btn = &state.show_button;
    let btn_bg = if btn.pressed {
        CLR_BRAND_DARK
    } else if btn.hover {
        CLR_BRAND
    } else {
        CLR_SECONDARY
    };
    draw_rounded_rect(hdc, &btn_rect, CARD_RADIUS, btn_bg, CLR_BRAND);
    let (bw, bh) = measure_text(hdc, &btn.text, fonts.small_bold);
    draw_text_simple(
        hdc,
        &btn.text,
        inner_x + (inner_right - inner_x - bw) / 2,
        btn_y + (BUTTON_HEIGHT - bh) / 2,
        CLR_FOREGROUND,
        fonts.small_bold,
    );
    state.show_button.rect = btn_rect;

    // Status line
    let status = state.status_text();
    let dot_color = if state.live_overlays > 0 {
        CLR_BRAND
    } else {
        CLR_MUTED_FG
    };
    let status_y = btn_rect.bottom + GAP;
    unsafe {
        let brush = CreateSolidBrush(dot_color);
        let pen = CreatePen(PS_SOLID, 0, dot_color);
        let old_brush = SelectObject(hdc, HGDIOBJ::from(brush));
        let old_pen = SelectObject(hdc, HGDIOBJ::from(pen));
        let _ = Ellipse(hdc, inner_x, status_y + 4, inner_x + 8, status_y + 12);
        SelectObject(hdc, old_pen);
        SelectObject(hdc, old_brush);
        let _ = DeleteObject(HGDIOBJ::from(brush));
        let _ = DeleteObject(HGDIOBJ::from(pen));
    }
    draw_text_simple(hdc, &status, inner_x + 16, status_y, CLR_MUTED_FG, fonts.xs);
}

fn draw_toast(hdc: HDC, client: &RECT, state: &UiState, fonts: &Fonts) {
    let msg = &state.toast_message;
    if msg.is_empty() {
        return;
    }

    let (tw, th) = measure_text(hdc, msg, fonts.small_bold);
    let toast_w = tw + 48;
    let toast_h = th + 20;
    let toast_x = (client.right - toast_w) / 2;
    let toast_y = client.bottom - toast_h - 12;

    let toast_rect = RECT {
        left: toast_x,
        top: toast_y,
        right: toast_x + toast_w,
        bottom: toast_y + toast_h,
    };
    draw_rounded_rect(hdc, &toast_rect, CARD_RADIUS, CLR_FOREGROUND, CLR_FOREGROUND);
    draw_text_simple(
        hdc,
        msg,
        toast_x + (toast_w - tw) / 2,
        toast_y + (toast_h - th) / 2,
        CLR_BACKGROUND,
        fonts.small_bold,
    );
}
