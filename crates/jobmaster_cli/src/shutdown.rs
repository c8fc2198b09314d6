use console::Term;

/// Wait for Ctrl+C.
///
/// Once the first signal arrives a second one force-quits the process with
/// exit code 130, so callers can drain in-flight work without risking a hang.
pub(crate) async fn wait_for_shutdown() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;

    let is_tty = Term::stderr().is_term();
    if is_tty {
        eprintln!("\n\nShutdown requested, waiting for running pipelines...");
        eprintln!("Press Ctrl+C again to force quit.");
    } else {
        tracing::warn!("Shutdown requested, waiting for running pipelines");
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if is_tty {
                eprintln!("Force quit!");
            }
            std::process::exit(130);
        }
    });

    Ok(())
}
