//! Service labels for well-known port numbers.
//!
//! Labels are inferred from the port number alone; nothing is read from the
//! remote service.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Label used for ports absent from the table.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Static map of well-known ports to service names.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (21, "FTP"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (80, "HTTP"),
        (110, "POP3"),
        (115, "SFTP"),
        (135, "MSRPC"),
        (139, "NetBIOS"),
        (143, "IMAP"),
        (194, "IRC"),
        (443, "HTTPS"),
        (445, "SMB"),
        (1433, "MSSQL"),
        (1434, "MSSQL Browser"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (5432, "PostgreSQL"),
        (5900, "VNC"),
        (6379, "Redis"),
        (8080, "HTTP Proxy"),
        (8443, "HTTPS Alt"),
        (27017, "MongoDB"),
    ])
});

/// Look up the service name for a given port.
///
/// Returns `None` if the port is not in the well-known services table.
pub fn get_service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Service label for a port, [`UNKNOWN_SERVICE`] when not recognized.
pub fn service_label(port: u16) -> &'static str {
    get_service_name(port).unwrap_or(UNKNOWN_SERVICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ports() {
        assert_eq!(get_service_name(22), Some("SSH"));
        assert_eq!(get_service_name(80), Some("HTTP"));
        assert_eq!(get_service_name(443), Some("HTTPS"));
        assert_eq!(get_service_name(8080), Some("HTTP Proxy"));
        assert_eq!(get_service_name(27017), Some("MongoDB"));
    }

    #[test]
    fn test_unknown_port() {
        assert_eq!(get_service_name(12345), None);
        assert_eq!(service_label(12345), "Unknown");
    }
}
