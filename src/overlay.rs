// Full-screen click-through clock overlay built on a layered window.
//
// The clock is composited with UpdateLayeredWindow from a screen-sized
// 32-bit DIB section: per-pixel alpha comes from the premultiplied clock
// buffer, whole-window alpha (the fade) from SourceConstantAlpha.
//
// All overlays live in a registry confined to the UI thread. Window
// procedures only reach it for WM_TIMER and WM_CLOSE, and destruction is
// posted back to the window so DestroyWindow never runs while the
// registry is borrowed.

use clockveil_shared::{
    OverlayConfig, OverlayError, OverlayId, OverlayRegistry, OverlayWindow, PixelBuffer,
    ReentryPolicy, SurfaceError, Tick, Trigger, TriggerOutcome,
};
use std::cell::RefCell;
use std::sync::OnceLock;
use std::time::Duration;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, SelectObject, AC_SRC_ALPHA,
    AC_SRC_OVER, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, BLENDFUNCTION, DIB_RGB_COLORS, HBITMAP,
    HDC, HGDIOBJ,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetSystemMetrics,
    GetWindowLongPtrW, IsWindow, KillTimer, LoadCursorW, PeekMessageW, PostMessageW,
    RegisterClassW, SetTimer, SetWindowLongPtrW, ShowWindow, UpdateLayeredWindow, GWLP_USERDATA,
    IDC_ARROW, MSG, PM_REMOVE, SM_CXSCREEN, SM_CYSCREEN, SW_SHOWNOACTIVATE, ULW_ALPHA, WM_APP,
    WM_CLOSE, WM_TIMER, WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
    WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

const CLASS_NAME: &str = "ClockveilOverlay\0";
const WINDOW_TITLE: &str = "Clockveil\0";

/// Posted by `request_close`; the window destroys itself on receipt.
const WM_DESTROY_OVERLAY: u32 = WM_APP + 1;

static CLASS_REGISTERED: OnceLock<()> = OnceLock::new();

thread_local! {
    static OVERLAYS: RefCell<Option<OverlayRegistry<Win32Overlay>>> = const { RefCell::new(None) };
}

/// Set up the overlay registry for this (UI) thread.
pub fn init(policy: ReentryPolicy, config: OverlayConfig) {
    OVERLAYS.with(|cell| {
        *cell.borrow_mut() = Some(OverlayRegistry::new(policy, config));
    });
}

/// Run `f` against the registry. `None` if it is uninitialised or already
/// borrowed further up the stack.
fn with_registry<R>(f: impl FnOnce(&mut OverlayRegistry<Win32Overlay>) -> R) -> Option<R> {
    OVERLAYS.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

/// Show a new clock overlay, subject to the configured re-entry policy.
pub fn show_clock() -> Result<TriggerOutcome, OverlayError> {
    with_registry(|reg| reg.trigger(Win32Overlay::create)).unwrap_or_else(|| {
        Err(OverlayError::Create(SurfaceError::WindowCreation(
            "overlay registry unavailable".into(),
        )))
    })
}

/// Number of overlays currently on screen.
pub fn live_count() -> usize {
    with_registry(|reg| reg.len()).unwrap_or(0)
}

/// Close every overlay and destroy their windows before returning.
///
/// Closing only posts the destroy request, and a quit message posted right
/// after would end the loop first, so the pending requests are pumped here.
/// Returns the number of windows destroyed.
pub fn shutdown() -> usize {
    let closed = with_registry(|reg| reg.close_all()).unwrap_or(0);
    if closed > 0 {
        tracing::debug!("closed {closed} overlay(s) for shutdown");
    }

    let mut destroyed = 0;
    let mut msg = MSG::default();
    unsafe {
        while PeekMessageW(
            &mut msg,
            None,
            WM_DESTROY_OVERLAY,
            WM_DESTROY_OVERLAY,
            PM_REMOVE,
        )
        .as_bool()
        {
            DispatchMessageW(&msg);
            destroyed += 1;
        }
    }
    destroyed
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn register_class() -> Result<(), SurfaceError> {
    if CLASS_REGISTERED.get().is_some() {
        return Ok(());
    }

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();
        let class_name = wide(CLASS_NAME);

        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: hinstance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            ..Default::default()
        };

        if RegisterClassW(&wc) == 0 {
            return Err(SurfaceError::ClassRegistration(
                windows::core::Error::from_win32().to_string(),
            ));
        }
    }

    let _ = CLASS_REGISTERED.set(());
    Ok(())
}

fn overlay_id(hwnd: HWND) -> Option<OverlayId> {
    let raw = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) };
    (raw > 0).then(|| OverlayId(raw as u64))
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_TIMER => {
            let tick = match Trigger::from_id(wparam.0) {
                Some(Trigger::Redraw) => Tick::Redraw,
                Some(Trigger::Fade) => Tick::Fade,
                None => return DefWindowProcW(hwnd, msg, wparam, lparam),
            };
            if let Some(id) = overlay_id(hwnd) {
                // A tick that finds the registry busy is simply skipped; the
                // fade is time based and catches up on the next one.
                let _ = with_registry(|reg| reg.dispatch(id, tick));
            }
            LRESULT(0)
        }

        WM_CLOSE => {
            let Some(id) = overlay_id(hwnd) else {
                let _ = DestroyWindow(hwnd);
                return LRESULT(0);
            };
            match with_registry(|reg| reg.close(id).is_some()) {
                Some(true) => {}
                // not (or no longer) owned by the registry
                Some(false) => {
                    let _ = DestroyWindow(hwnd);
                }
                None => {
                    let _ = PostMessageW(Some(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0));
                }
            }
            LRESULT(0)
        }

        WM_DESTROY_OVERLAY => {
            if let Err(e) = DestroyWindow(hwnd) {
                tracing::error!("DestroyWindow failed, overlay window leaked: {e}");
            }
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Screen-sized DIB section selected into a memory DC.
struct LayeredSurface {
    mem_dc: HDC,
    bitmap: HBITMAP,
    old_bitmap: HGDIOBJ,
    bits: *mut u32,
    width: i32,
    height: i32,
}

impl LayeredSurface {
    fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        unsafe {
            let mem_dc = CreateCompatibleDC(None);
            if mem_dc.is_invalid() {
                return Err(SurfaceError::Surface("CreateCompatibleDC failed".into()));
            }

            let mut bits: *mut u32 = std::ptr::null_mut();
            let bitmap = match CreateDIBSection(
                Some(mem_dc),
                &bmi,
                DIB_RGB_COLORS,
                &mut bits as *mut _ as *mut _,
                None,
                0,
            ) {
                Ok(bitmap) if !bits.is_null() => bitmap,
                Ok(bitmap) => {
                    let _ = DeleteObject(HGDIOBJ::from(bitmap));
                    let _ = DeleteDC(mem_dc);
                    return Err(SurfaceError::Surface("DIB section has no pixels".into()));
                }
                Err(e) => {
                    let _ = DeleteDC(mem_dc);
                    return Err(SurfaceError::Surface(e.to_string()));
                }
            };

            let old_bitmap = SelectObject(mem_dc, HGDIOBJ::from(bitmap));
            Ok(Self {
                mem_dc,
                bitmap,
                old_bitmap,
                bits,
                width,
                height,
            })
        }
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        let len = (self.width as usize) * (self.height as usize);
        unsafe { std::slice::from_raw_parts_mut(self.bits, len) }
    }

    fn blit_centered(&mut self, frame: &PixelBuffer) {
        let (width, height) = (self.width as usize, self.height as usize);
        frame.copy_centered_into(self.pixels_mut(), width, height);
    }
}

impl Drop for LayeredSurface {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.mem_dc, self.old_bitmap);
            let _ = DeleteObject(HGDIOBJ::from(self.bitmap));
            let _ = DeleteDC(self.mem_dc);
        }
    }
}

/// Native window backing one clock overlay.
pub struct Win32Overlay {
    hwnd: HWND,
    width: i32,
    height: i32,
    surface: Option<LayeredSurface>,
    visible: bool,
}

impl Win32Overlay {
    /// Create the (still hidden) overlay window covering the primary display.
    pub fn create(id: OverlayId) -> Result<Self, SurfaceError> {
        register_class()?;

        unsafe {
            let width = GetSystemMetrics(SM_CXSCREEN);
            let height = GetSystemMetrics(SM_CYSCREEN);
            let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();
            let class_name = wide(CLASS_NAME);
            let title = wide(WINDOW_TITLE);

            let hwnd = CreateWindowExW(
                WS_EX_LAYERED
                    | WS_EX_TRANSPARENT
                    | WS_EX_TOPMOST
                    | WS_EX_TOOLWINDOW
                    | WS_EX_NOACTIVATE,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_POPUP,
                0,
                0,
                width,
                height,
                None,
                None,
                Some(hinstance.into()),
                None,
            )
            .map_err(|e| SurfaceError::WindowCreation(e.to_string()))?;

            SetWindowLongPtrW(hwnd, GWLP_USERDATA, id.0 as isize);
            tracing::debug!("{id}: window created, {width}x{height}");

            Ok(Self {
                hwnd,
                width,
                height,
                surface: None,
                visible: false,
            })
        }
    }

    fn composite(&self, opacity: u8) -> windows::core::Result<()> {
        let Some(surface) = self.surface.as_ref() else {
            return Ok(());
        };
        let pt_src = POINT { x: 0, y: 0 };
        let pt_dst = POINT { x: 0, y: 0 };
        let size = SIZE {
            cx: surface.width,
            cy: surface.height,
        };
        let blend = BLENDFUNCTION {
            BlendOp: AC_SRC_OVER as u8,
            SourceConstantAlpha: opacity,
            AlphaFormat: AC_SRC_ALPHA as u8,
            ..Default::default()
        };

        unsafe {
            UpdateLayeredWindow(
                self.hwnd,
                None,
                Some(&pt_dst),
                Some(&size),
                Some(surface.mem_dc),
                Some(&pt_src),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            )
        }
    }
}

impl OverlayWindow for Win32Overlay {
    fn is_valid(&self) -> bool {
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn start_trigger(&mut self, trigger: Trigger, interval: Duration) -> Result<(), SurfaceError> {
        let ms = interval.as_millis().clamp(1, u32::MAX as u128) as u32;
        let id = unsafe { SetTimer(Some(self.hwnd), trigger.id(), ms, None) };
        if id == 0 {
            return Err(SurfaceError::Timer(format!(
                "SetTimer({trigger:?}, {ms}ms): {}",
                windows::core::Error::from_win32()
            )));
        }
        Ok(())
    }

    fn stop_trigger(&mut self, trigger: Trigger) {
        unsafe {
            let _ = KillTimer(Some(self.hwnd), trigger.id());
        }
    }

    fn present(&mut self, frame: &PixelBuffer, opacity: u8) -> Result<(), SurfaceError> {
        if self.surface.is_none() {
            self.surface = Some(LayeredSurface::new(self.width, self.height)?);
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.blit_centered(frame);
        }
        self.composite(opacity)
            .map_err(|e| SurfaceError::Present(e.to_string()))?;

        if !self.visible {
            unsafe {
                let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
            }
            self.visible = true;
        }
        Ok(())
    }

    fn set_opacity(&mut self, opacity: u8) -> Result<(), SurfaceError> {
        self.composite(opacity)
            .map_err(|e| SurfaceError::Opacity(e.to_string()))
    }

    fn release_surface(&mut self) {
        self.surface = None;
    }

    fn request_close(&mut self) -> Result<(), SurfaceError> {
        unsafe {
            PostMessageW(Some(self.hwnd), WM_DESTROY_OVERLAY, WPARAM(0), LPARAM(0))
                .map_err(|e| SurfaceError::Destroy(e.to_string()))
        }
    }
}
