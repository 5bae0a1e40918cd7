use clap::Parser;
use std::net::SocketAddr;

/// Server configuration, read from flags or the environment
#[derive(Debug, Clone, Parser)]
#[command(name = "pdf-tools-web", about = "PDF tools web service", version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "PDF_TOOLS_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Largest accepted request body, in MiB
    #[arg(long, env = "PDF_TOOLS_MAX_UPLOAD_MB", default_value = "30")]
    pub max_upload_mb: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_upload_mb: 30,
        }
    }
}

impl Config {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_flags() {
        let parsed = Config::try_parse_from(["pdf-tools-web"]).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.addr, defaults.addr);
        assert_eq!(parsed.max_upload_mb, defaults.max_upload_mb);
        assert_eq!(defaults.max_upload_bytes(), 30 * 1024 * 1024);
    }

    #[test]
    fn test_flags_override() {
        let parsed =
            Config::try_parse_from(["pdf-tools-web", "--addr", "127.0.0.1:8080", "--max-upload-mb", "5"])
                .unwrap();
        assert_eq!(parsed.addr.port(), 8080);
        assert_eq!(parsed.max_upload_bytes(), 5 * 1024 * 1024);
    }
}
