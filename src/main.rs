// Prevents console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod logging;
#[cfg(windows)]
mod overlay;
#[cfg(windows)]
mod ui;

use clockveil_shared::config::{self, AppConfig};

fn main() {
    let cfg = config::load_config().sanitized();
    logging::init(cfg.debug_logging, &config::app_dir());
    tracing::info!(
        "Clockveil v{} starting (reentry: {:?}, live hands: {})",
        env!("CARGO_PKG_VERSION"),
        cfg.reentry,
        cfg.live_hands
    );

    run(cfg);
}

#[cfg(windows)]
fn run(cfg: AppConfig) {
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, TranslateMessage, MSG,
    };

    overlay::init(cfg.reentry, cfg.overlay_config());

    // Create the control window
    let hwnd = match ui::create_window(&cfg) {
        Ok(hwnd) => hwnd,
        Err(e) => {
            tracing::error!("cannot create control window: {e}");
            return;
        }
    };
    ui::show_window(hwnd);

    // Win32 message loop
    unsafe {
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    // Normally already done in the control window's WM_DESTROY
    let destroyed = overlay::shutdown();
    tracing::info!("exiting, destroyed {destroyed} remaining overlay window(s)");
}

#[cfg(not(windows))]
fn run(_cfg: AppConfig) {
    tracing::error!("Clockveil draws native Windows overlays; this platform is not supported");
}
