//! Windows window capture using Win32 GDI
//!
//! This module implements [`WindowCapture`] for Windows using:
//!
//! - **Window Enumeration**: Win32 `EnumWindows`, keeping visible windows with
//!   a non-empty title
//! - **Capture**: `PrintWindow` into a compatible bitmap, read back with
//!   `GetDIBits` as top-down 32-bit BGRX
//!
//! Every device context, bitmap and selection acquired for a capture is
//! owned by a guard and released on drop, so the success path and every
//! early return leave no GDI handles behind.
//!
//! Window handles are the `HWND` value formatted as a decimal `isize`.

use std::ffi::c_void;

use windows_sys::Win32::{
    Foundation::{LPARAM, RECT},
    Graphics::Gdi::{
        BI_RGB, BITMAPINFO, BITMAPINFOHEADER, CreateCompatibleBitmap, CreateCompatibleDC,
        DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDIBits, GetWindowDC, ReleaseDC, SelectObject,
    },
    Storage::Xps::PrintWindow,
    UI::WindowsAndMessaging::{
        EnumWindows, GetClientRect, GetWindowTextLengthW, GetWindowTextW, IsWindow,
        IsWindowVisible,
    },
};

use super::{ImageBuffer, WindowCapture};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{WindowHandle, WindowInfo},
};

type BOOL = i32;
type HWND = *mut c_void;
type HDC = *mut c_void;
type HGDIOBJ = *mut c_void;

const FALSE: BOOL = 0;
const TRUE: BOOL = 1;

/// Capture only the client area
const PW_CLIENTONLY: u32 = 0x1;
/// Ask DWM for the composed content (needed for hardware-accelerated windows)
const PW_RENDERFULLCONTENT: u32 = 0x2;

/// Window capture backed by Win32 GDI
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsBackend;

impl WindowsBackend {
    /// Creates a new GDI backend
    pub fn new() -> Self {
        Self
    }

    fn failed(reason: impl Into<String>) -> CaptureError {
        CaptureError::CaptureFailed {
            backend: "gdi",
            reason:  reason.into(),
        }
    }

    /// Enumerates visible top-level windows in z-order, untitled ones included
    fn enumerate_windows() -> CaptureResult<Vec<isize>> {
        unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
            // SAFETY: lparam is the &mut Vec<isize> passed to EnumWindows below,
            // alive for the duration of the call
            let handles = unsafe { &mut *(lparam as *mut Vec<isize>) };

            if unsafe { IsWindowVisible(hwnd) } == FALSE {
                return TRUE;
            }

            handles.push(hwnd as isize);
            TRUE
        }

        let mut handles: Vec<isize> = Vec::new();
        let ok = unsafe {
            EnumWindows(
                Some(enum_callback),
                &mut handles as *mut Vec<isize> as LPARAM,
            )
        };

        if ok == FALSE {
            return Err(Self::failed("EnumWindows failed"));
        }

        Ok(handles)
    }

    /// Reads a window title as UTF-16 and converts it lossily
    fn window_title(hwnd: HWND) -> String {
        let len = unsafe { GetWindowTextLengthW(hwnd) };
        if len <= 0 {
            return String::new();
        }

        let mut buffer = vec![0u16; len as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd, buffer.as_mut_ptr(), buffer.len() as i32) };
        if copied <= 0 {
            return String::new();
        }

        String::from_utf16_lossy(&buffer[..copied as usize])
    }

    fn parse_handle(handle: &WindowHandle) -> CaptureResult<HWND> {
        handle
            .parse::<isize>()
            .map(|raw| raw as HWND)
            .map_err(|_| Self::failed(format!("Invalid window handle '{}'", handle)))
    }

    fn client_size(hwnd: HWND) -> CaptureResult<(i32, i32)> {
        let mut rect = RECT {
            left:   0,
            top:    0,
            right:  0,
            bottom: 0,
        };

        if unsafe { GetClientRect(hwnd, &mut rect) } == FALSE {
            return Err(Self::failed("GetClientRect failed"));
        }

        let width = rect.right - rect.left;
        let height = rect.bottom - rect.top;
        if width <= 0 || height <= 0 {
            return Err(Self::failed(format!(
                "Window has an empty client area ({}x{})",
                width, height
            )));
        }

        Ok((width, height))
    }
}

impl WindowCapture for WindowsBackend {
    fn name(&self) -> &'static str {
        "gdi"
    }

    fn list_windows(&self) -> CaptureResult<Vec<WindowInfo>> {
        let windows: Vec<WindowInfo> = Self::enumerate_windows()?
            .into_iter()
            .map(|raw| WindowInfo::new(raw.to_string(), Self::window_title(raw as HWND)))
            .collect();

        tracing::debug!("Enumerated {} windows", windows.len());
        Ok(windows)
    }

    fn capture_window(&self, handle: &WindowHandle) -> CaptureResult<ImageBuffer> {
        let hwnd = Self::parse_handle(handle)?;

        if unsafe { IsWindow(hwnd) } == FALSE {
            return Err(CaptureError::WindowClosed);
        }

        let (width, height) = Self::client_size(hwnd)?;

        let window_dc = WindowDc::acquire(hwnd)?;
        let memory_dc = MemoryDc::compatible_with(window_dc.hdc)?;
        let bitmap = Bitmap::compatible_with(window_dc.hdc, width, height)?;
        let selection = Selection::select(memory_dc.hdc, bitmap.handle)?;

        let printed =
            unsafe { PrintWindow(hwnd, memory_dc.hdc, PW_CLIENTONLY | PW_RENDERFULLCONTENT) };
        if printed == FALSE {
            // Window may have been destroyed after the IsWindow check
            if unsafe { IsWindow(hwnd) } == FALSE {
                return Err(CaptureError::WindowClosed);
            }
            return Err(Self::failed("PrintWindow failed"));
        }

        // The bitmap must not be selected into a DC while GetDIBits reads it
        drop(selection);

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize:          std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth:         width,
                biHeight:        -height,
                biPlanes:        1,
                biBitCount:      32,
                biCompression:   BI_RGB,
                biSizeImage:     0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed:       0,
                biClrImportant:  0,
            },
            // SAFETY: RGBQUAD is plain data; all-zero is valid
            bmiColors: [unsafe { std::mem::zeroed() }],
        };

        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        let lines = unsafe {
            GetDIBits(
                memory_dc.hdc,
                bitmap.handle,
                0,
                height as u32,
                pixels.as_mut_ptr().cast(),
                &mut info,
                DIB_RGB_COLORS,
            )
        };

        if lines != height {
            return Err(Self::failed(format!(
                "GetDIBits copied {} of {} lines",
                lines, height
            )));
        }

        tracing::info!("Captured window {}: {}x{}", handle, width, height);
        ImageBuffer::from_bgrx(width as u32, height as u32, &pixels)
    }
}

/// Window device context, released with `ReleaseDC`
struct WindowDc {
    hwnd: HWND,
    hdc:  HDC,
}

impl WindowDc {
    fn acquire(hwnd: HWND) -> CaptureResult<Self> {
        let hdc = unsafe { GetWindowDC(hwnd) };
        if hdc.is_null() {
            return Err(WindowsBackend::failed("GetWindowDC failed"));
        }
        Ok(Self { hwnd, hdc })
    }
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(self.hwnd, self.hdc);
        }
    }
}

/// Memory device context, released with `DeleteDC`
struct MemoryDc {
    hdc: HDC,
}

impl MemoryDc {
    fn compatible_with(hdc: HDC) -> CaptureResult<Self> {
        let memory = unsafe { CreateCompatibleDC(hdc) };
        if memory.is_null() {
            return Err(WindowsBackend::failed("CreateCompatibleDC failed"));
        }
        Ok(Self { hdc: memory })
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            DeleteDC(self.hdc);
        }
    }
}

/// Device-dependent bitmap, released with `DeleteObject`
struct Bitmap {
    handle: HGDIOBJ,
}

impl Bitmap {
    fn compatible_with(hdc: HDC, width: i32, height: i32) -> CaptureResult<Self> {
        let handle = unsafe { CreateCompatibleBitmap(hdc, width, height) };
        if handle.is_null() {
            return Err(WindowsBackend::failed(format!(
                "CreateCompatibleBitmap failed for {}x{}",
                width, height
            )));
        }
        Ok(Self { handle })
    }
}

impl Drop for Bitmap {
    fn drop(&mut self) {
        unsafe {
            DeleteObject(self.handle);
        }
    }
}

/// Object selected into a DC; restores the previous selection on drop
struct Selection {
    hdc:      HDC,
    previous: HGDIOBJ,
}

impl Selection {
    fn select(hdc: HDC, object: HGDIOBJ) -> CaptureResult<Self> {
        let previous = unsafe { SelectObject(hdc, object) };
        if previous.is_null() {
            return Err(WindowsBackend::failed("SelectObject failed"));
        }
        Ok(Self { hdc, previous })
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.hdc, self.previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_handle_rejects_garbage() {
        let err = WindowsBackend::parse_handle(&"not-a-handle".to_string()).unwrap_err();
        assert!(err.to_string().contains("Invalid window handle"));
    }

    #[test]
    fn test_parse_handle_round_trip() {
        let hwnd = WindowsBackend::parse_handle(&"4242".to_string()).unwrap();
        assert_eq!(hwnd as isize, 4242);
    }

    #[test]
    fn test_destroyed_window_reports_closed() {
        // Zero is never a valid top-level window
        let result = WindowsBackend::new().capture_window(&"0".to_string());
        assert!(matches!(result, Err(CaptureError::WindowClosed)));
    }

    #[test]
    #[ignore = "requires an interactive desktop"]
    fn test_list_windows_live() {
        // Every visible top-level window is listed, titled or not
        let handles = WindowsBackend::enumerate_windows().unwrap();
        let windows = WindowsBackend::new().list_windows().unwrap();
        assert_eq!(windows.len(), handles.len());
    }

    #[test]
    #[ignore = "requires an interactive desktop"]
    fn test_capture_first_window_live() {
        let backend = WindowsBackend::new();
        let windows = backend.list_windows().unwrap();
        let first = windows.first().expect("at least one visible window");
        let image = backend.capture_window(&first.id).unwrap();
        assert!(image.width() > 0 && image.height() > 0);
    }
}
