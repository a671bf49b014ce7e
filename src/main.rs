use steam_mcp::{cli, config::Config, server};

fn main() -> anyhow::Result<()> {
    let cmd = cli::build_cli();
    let matches = cmd.get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    let version_flag = matches.get_flag("version");

    cli::init_logging(log_level.as_deref());

    if version_flag {
        println!("steam-mcp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // A missing or placeholder API key is fatal at startup, never a
    // per-call error.
    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    server::run_stdio_server(cfg)?;
    Ok(())
}
