//! Process-level error handling.

/// Install a panic hook that points users at the log file before the
/// default hook prints the panic.
pub fn init_panic_handling() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("bezy-pencil crashed. Run with --verbose --log-file and check the log for details.");
        default_hook(info);
    }));
}

/// Print the error chain to stderr and exit with code 1.
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("Error running bezy-pencil:");
    eprintln!("{error}");
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}
