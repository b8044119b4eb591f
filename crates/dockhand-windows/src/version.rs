//! OS build detection from
//! `HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Windows NT\CurrentVersion`.
//!
//! The registry is used instead of `GetVersionEx`, which lies to
//! processes without a compatibility manifest.

use dockhand_core::log_warn;
use dockhand_core::registry::system::OsVersion;
use windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE, RegCloseKey, RegOpenKeyExW, RegQueryValueExW,
};
use windows::core::PCWSTR;

const VERSION_KEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";
const BUILD_VALUE: &str = "CurrentBuildNumber";

/// Detects the running OS family. Falls back to `Legacy` if the build
/// number cannot be read.
pub fn os_version() -> OsVersion {
    match build_number() {
        Ok(build) => OsVersion::from_build(build),
        Err(e) => {
            log_warn!("Could not read OS build number: {e}");
            OsVersion::Legacy
        }
    }
}

fn build_number() -> Result<u32, String> {
    let wide_key = wide(VERSION_KEY);
    let mut key = HKEY::default();
    // SAFETY: RegOpenKeyExW is a standard Win32 registry API. We pass valid
    // pointers and close the key after use.
    let status = unsafe {
        RegOpenKeyExW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(wide_key.as_ptr()),
            None,
            KEY_QUERY_VALUE,
            &mut key,
        )
    };
    if status.is_err() {
        return Err(format!("could not open registry key: {status:?}"));
    }
    let value = query_string(key, BUILD_VALUE);
    // SAFETY: RegCloseKey is safe to call on any valid HKEY.
    let _ = unsafe { RegCloseKey(key) };

    let value = value?;
    value
        .trim()
        .parse()
        .map_err(|e| format!("bad build number {value:?}: {e}"))
}

/// Reads a REG_SZ value under the opened key.
fn query_string(key: HKEY, name: &str) -> Result<String, String> {
    let wide_name = wide(name);
    let mut buffer = [0u16; 64];
    let mut size = (buffer.len() * 2) as u32;
    // SAFETY: RegQueryValueExW writes at most `size` bytes into our buffer
    // and updates `size` with the byte count written.
    let status = unsafe {
        RegQueryValueExW(
            key,
            PCWSTR(wide_name.as_ptr()),
            None,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut size),
        )
    };
    if status.is_err() {
        return Err(format!("could not read {name}: {status:?}"));
    }
    let chars = (size as usize / 2).min(buffer.len());
    let end = buffer[..chars].iter().position(|&c| c == 0).unwrap_or(chars);
    Ok(String::from_utf16_lossy(&buffer[..end]))
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
