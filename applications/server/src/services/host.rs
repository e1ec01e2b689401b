//! Local host facts
use std::io;

/// Hostname of this machine as the OS reports it.
///
/// Falls back to `HOSTNAME`, then [`UNKNOWN`](super::UNKNOWN), when the OS
/// name is empty. A failed OS lookup is returned as an error.
pub fn hostname() -> io::Result<String> {
    let name = ::hostname::get()?;
    let name = name.to_string_lossy();
    let name = name.trim();
    if !name.is_empty() {
        return Ok(name.to_string());
    }

    Ok(std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| super::UNKNOWN.to_string()))
}

/// Current UTC time as RFC 3339 with millisecond precision
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_is_never_empty() {
        let name = hostname().unwrap();
        assert!(!name.is_empty());
    }

    #[test]
    fn hostname_matches_the_os() {
        let os_name = ::hostname::get().unwrap();
        let os_name = os_name.to_string_lossy();
        if !os_name.trim().is_empty() {
            assert_eq!(hostname().unwrap(), os_name.trim());
        }
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
