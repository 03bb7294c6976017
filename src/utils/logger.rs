use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Filter used when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "hypixelio=debug,warn"
    } else {
        "hypixelio=info"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Logs go to stderr so stdout only carries the JSON the CLI prints.
pub fn init(format: LogFormat, verbose: bool) {
    let registry = tracing_subscriber::registry().with(filter(verbose));
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Compact => registry.with(layer.with_target(false).compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_crate_level() {
        assert_eq!(default_directive(true), "hypixelio=debug,warn");
        assert_eq!(default_directive(false), "hypixelio=info");
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
