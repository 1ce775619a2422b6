use std::{
    io,
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};

use windows::{
    core::PCWSTR,
    Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, MessageBoxW, PeekMessageW, TranslateMessage, IDOK, MB_ICONERROR,
        MB_ICONINFORMATION, MB_ICONQUESTION, MB_ICONWARNING, MB_OK, MB_OKCANCEL, MB_SETFOREGROUND,
        MESSAGEBOX_STYLE, MSG, PM_REMOVE,
    },
};

use crate::{error::InstallError, installer::InstallOutcome, paths::to_wstring};

fn message_box(title: &str, text: &str, style: MESSAGEBOX_STYLE) -> bool {
    let title = to_wstring(title);
    let text = to_wstring(text);
    let result = unsafe {
        MessageBoxW(
            None,
            PCWSTR(text.as_ptr()),
            PCWSTR(title.as_ptr()),
            style | MB_SETFOREGROUND,
        )
    };
    result == IDOK
}

/// "ascend me" / "forgive me".
pub fn confirm_install(width: u32, height: u32) -> bool {
    let text = format!(
        "Install the bundled {width}x{height} wallpaper as your desktop background?\n\nOK: ascend me\nCancel: forgive me"
    );
    message_box(" ", &text, MB_OKCANCEL | MB_ICONQUESTION)
}

pub fn show_error(err: &InstallError) {
    let style = match err {
        InstallError::NoImage => MB_OK | MB_ICONWARNING,
        _ => MB_OK | MB_ICONERROR,
    };
    message_box(err.message_title(), &err.user_message(), style);
}

pub fn show_installed() {
    message_box("Done", "Wallpaper installed successfully.", MB_OK | MB_ICONINFORMATION);
}

/// Keeps the thread's message queue serviced while the install worker runs.
pub fn wait_for_install(rx: &Receiver<InstallOutcome>) -> InstallOutcome {
    loop {
        unsafe {
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        match rx.recv_timeout(Duration::from_millis(15)) {
            Ok(outcome) => return outcome,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(InstallError::Worker(io::Error::other(
                    "install worker exited without reporting a result",
                )));
            }
        }
    }
}
