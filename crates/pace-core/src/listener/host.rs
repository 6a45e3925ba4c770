//! Hostname lookup for the callback address handed to workers.
use std::io;

/// Machine hostname as reported by `gethostname(2)`.
#[cfg(unix)]
pub fn local_hostname() -> io::Result<String> {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8(buf[..len].to_vec())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Machine hostname (non-Unix fallback).
#[cfg(not(unix))]
pub fn local_hostname() -> io::Result<String> {
    std::env::var("COMPUTERNAME").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))
}
