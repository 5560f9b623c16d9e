use engine::ProxyConfig;

/// Parses the `--httpproxy` value.
///
/// Only the three-token `http://host:port` form selects a manual proxy; any
/// other shape silently falls back to system proxy discovery. The silent
/// fallback reproduces the historical client behaviour.
#[must_use]
pub fn parse_proxy(spec: &str) -> ProxyConfig {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return ProxyConfig::System;
    }

    // http: //192.168.178.23 : 8080
    //  0            1            2
    let host = parts[1].strip_prefix("//").unwrap_or(parts[1]).to_owned();
    let port = parts[2].parse().unwrap_or(0);
    ProxyConfig::Manual { host, port }
}

#[cfg(test)]
mod tests {
    use engine::ProxyConfig;

    use super::parse_proxy;

    #[test]
    fn full_form_selects_a_manual_proxy() {
        assert_eq!(
            parse_proxy("http://proxy.example.com:8080"),
            ProxyConfig::Manual {
                host: "proxy.example.com".to_owned(),
                port: 8080,
            }
        );
    }

    #[test]
    fn bare_host_port_falls_back_to_system_discovery() {
        assert_eq!(parse_proxy("proxy.example.com:8080"), ProxyConfig::System);
    }

    #[test]
    fn garbage_falls_back_to_system_discovery() {
        assert_eq!(parse_proxy("not a proxy"), ProxyConfig::System);
        assert_eq!(parse_proxy(""), ProxyConfig::System);
    }

    #[test]
    fn unparseable_port_is_kept_as_zero() {
        assert_eq!(
            parse_proxy("http://proxy.example.com:none"),
            ProxyConfig::Manual {
                host: "proxy.example.com".to_owned(),
                port: 0,
            }
        );
    }
}
