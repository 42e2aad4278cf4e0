fn main() {
    #[cfg(feature = "cli")]
    demorse::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("demorse: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
