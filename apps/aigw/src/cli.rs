use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "aigw", version, about = "Reverse-proxy gateway for AI inference providers")]
pub(crate) struct Cli {
    /// Bind host.
    #[arg(long, env = "AIGW_HOST", default_value = "127.0.0.1")]
    pub(crate) host: String,

    /// Bind port.
    #[arg(long, env = "AIGW_PORT", default_value_t = 8686)]
    pub(crate) port: u16,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, env = "AIGW_LOG", default_value = "info")]
    pub(crate) log: String,
}
