pub mod debug;
pub mod init;
pub mod run;

/// Reports that `command` needs the Win32 shell and exits.
#[cfg(not(windows))]
pub fn windows_only(command: &str) -> ! {
    eprintln!("Error: `dockhand {command}` requires Windows.");
    std::process::exit(1);
}
