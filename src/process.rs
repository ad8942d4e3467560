//! Process-level plumbing for the binaries: panics and termination signals.

use tracing::error;

use crate::immut_data::consts::PANIC_EXIT_GRACE;

/// Logs any panic through `tracing` and exits with status 1 after a short
/// grace period so the line reaches the terminal.
///
/// This applies to every thread, including the tasks serenity spawns per
/// event: a panic inside one interaction handler takes the process down.
/// Handled failures never panic; they end in a log line and a reply.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info.payload();
        let reason = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown panic payload");
        let location = info
            .location()
            .map(ToString::to_string)
            .unwrap_or_default();

        error!(error = reason, location = %location, "Uncaught panic");
        std::thread::sleep(PANIC_EXIT_GRACE);
        std::process::exit(1);
    }));
}

/// Resolves with the name of the first termination signal received.
pub async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
