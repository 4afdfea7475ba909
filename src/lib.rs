pub mod bias;
pub mod lang;
pub mod svg;
pub mod wiki;

pub const USER_AGENT: &str = concat!(
    "bias-codex/",
    env!("CARGO_PKG_VERSION"),
    " (Cognitive Bias Codex tools)"
);

/// Install the stderr `tracing` subscriber shared by both binaries.
///
/// `RUST_LOG` is honoured; crate logs default to `info`.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bias_codex=info".parse()?),
        )
        .init();
    Ok(())
}
