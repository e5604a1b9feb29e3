pub mod controls;
pub mod painting;
pub mod theme;

use controls::*;
use theme::*;

use crate::overlay;
use clockveil_shared::config::AppConfig;
use clockveil_shared::TriggerOutcome;

use std::cell::RefCell;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::*;

const CLASS_NAME: &str = "ClockveilControlWnd";
const TOAST_TIMER_ID: usize = 100;
const STATUS_TIMER_ID: usize = 101;
const STATUS_POLL_MS: u32 = 250;

thread_local! {
    static UI_STATE: RefCell<Option<UiState>> = const { RefCell::new(None) };
}

/// Run `f` against the UI state; `None` before creation or when re-entered.
fn with_state<R>(f: impl FnOnce(&mut UiState) -> R) -> Option<R> {
    UI_STATE.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn lparam_point(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    (x, y)
}

/// Create and return the control window (initially hidden)
pub fn create_window(config: &AppConfig) -> windows::core::Result<HWND> {
    let class_name = wide(CLASS_NAME);

    UI_STATE.with(|cell| {
        *cell.borrow_mut() = Some(UiState::new(config.fade_duration_ms, config.live_hands));
    });

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hbrBackground: CreateSolidBrush(CLR_BACKGROUND),
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            hIcon: LoadIconW(None, IDI_APPLICATION).unwrap_or_default(),
            ..Default::default()
        };

        RegisterClassW(&wc);

        // Calculate window size to get desired client area
        let mut wr = RECT {
            left: 0,
            top: 0,
            right: WINDOW_WIDTH,
            bottom: WINDOW_HEIGHT,
        };
        let style = WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX;
        let _ = AdjustWindowRectEx(&mut wr, style, false, WINDOW_EX_STYLE::default());

        let title = wide("Clockveil");

        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            PCWSTR(class_name.as_ptr()),
            PCWSTR(title.as_ptr()),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            wr.right - wr.left,
            wr.bottom - wr.top,
            None,
            None,
            Some(hinstance.into()),
            None,
        )?;

        SetTimer(Some(hwnd), STATUS_TIMER_ID, STATUS_POLL_MS, None);
        Ok(hwnd)
    }
}

/// Show and focus the control window
pub fn show_window(hwnd: HWND) {
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = SetForegroundWindow(hwnd);
    }
}

/// Trigger a repaint
pub fn invalidate(hwnd: HWND) {
    unsafe {
        let _ = InvalidateRect(Some(hwnd), None, true);
    }
}

/// Show a toast message
pub fn show_toast(hwnd: HWND, message: &str) {
    let shown = with_state(|ui| {
        ui.toast_message = message.to_string();
        ui.toast_visible = true;
    });
    if shown.is_some() {
        invalidate(hwnd);
        // Auto-hide after 2 seconds
        unsafe {
            SetTimer(Some(hwnd), TOAST_TIMER_ID, 2000, None);
        }
    }
}

/// Button activation: hand the request to the overlay registry.
fn on_show_clicked(hwnd: HWND) {
    match overlay::show_clock() {
        Ok(TriggerOutcome::Created(id)) => {
            tracing::info!("{id} requested from control window");
            show_toast(hwnd, "Clock shown");
        }
        Ok(TriggerOutcome::Ignored(id)) => {
            tracing::debug!("{id} already showing");
            show_toast(hwnd, "A clock is already showing");
        }
        Err(e) => {
            tracing::error!("showing clock failed: {e}");
            show_toast(hwnd, "Could not show the clock");
        }
    }
    refresh_status(hwnd);
}

/// Repaint if the number of live overlays changed since the last paint.
fn refresh_status(hwnd: HWND) {
    let live = overlay::live_count();
    let changed = with_state(|ui| {
        let changed = ui.live_overlays != live;
        ui.live_overlays = live;
        changed
    });
    if changed == Some(true) {
        invalidate(hwnd);
    }
}

/// Window procedure
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);

            // Double-buffer to avoid flicker
            let mut client = RECT::default();
            let _ = GetClientRect(hwnd, &mut client);

            let mem_dc = CreateCompatibleDC(Some(hdc));
            let mem_bmp = CreateCompatibleBitmap(hdc, client.right, client.bottom);
            let old_bmp = SelectObject(mem_dc, HGDIOBJ::from(mem_bmp));

            let _ = with_state(|ui| painting::paint(mem_dc, &client, ui));

            // Blit to screen
            let _ = BitBlt(
                hdc,
                0,
                0,
                client.right,
                client.bottom,
                Some(mem_dc),
                0,
                0,
                SRCCOPY,
            );

            SelectObject(mem_dc, old_bmp);
            let _ = DeleteObject(HGDIOBJ::from(mem_bmp));
            let _ = DeleteDC(mem_dc);
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }

        WM_LBUTTONDOWN => {
            let (x, y) = lparam_point(lparam);
            let hit = with_state(|ui| {
                let hit = ui.show_button.contains(x, y);
                ui.show_button.pressed = hit;
                hit
            });
            if hit == Some(true) {
                SetCapture(hwnd);
                invalidate(hwnd);
                return LRESULT(0);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_LBUTTONUP => {
            let (x, y) = lparam_point(lparam);
            let clicked = with_state(|ui| {
                let was_pressed = std::mem::take(&mut ui.show_button.pressed);
                was_pressed && ui.show_button.contains(x, y)
            });
            if let Some(was_click) = clicked {
                let _ = ReleaseCapture();
                if was_click {
                    on_show_clicked(hwnd);
                }
                invalidate(hwnd);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_MOUSEMOVE => {
            let (x, y) = lparam_point(lparam);
            let changed = with_state(|ui| {
                let hover = ui.show_button.contains(x, y);
                let changed = hover != ui.show_button.hover;
                ui.show_button.hover = hover;
                changed
            });
            if changed == Some(true) {
                invalidate(hwnd);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_TIMER => {
            match wparam.0 {
                TOAST_TIMER_ID => {
                    let _ = KillTimer(Some(hwnd), TOAST_TIMER_ID);
                    let _ = with_state(|ui| {
                        ui.toast_visible = false;
                        ui.toast_message.clear();
                    });
                    invalidate(hwnd);
                }
                STATUS_TIMER_ID => refresh_status(hwnd),
                _ => {}
            }
            LRESULT(0)
        }

        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            let _ = KillTimer(Some(hwnd), STATUS_TIMER_ID);
            let _ = KillTimer(Some(hwnd), TOAST_TIMER_ID);
            overlay::shutdown();
            UI_STATE.with(|cell| {
                if let Ok(mut state) = cell.try_borrow_mut() {
                    *state = None;
                }
            });
            PostQuitMessage(0);
            LRESULT(0)
        }

        WM_ERASEBKGND => {
            // Handled in WM_PAINT with double buffering
            LRESULT(1)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
