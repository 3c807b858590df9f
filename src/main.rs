//! Protocol front-end of the engine. Reads commands from stdin and answers on
//! stdout; logs go to stderr and are filtered with `RUST_LOG` (warnings by
//! default).

use std::io;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    if std::env::args().nth(1).as_deref() == Some("--version") {
        hexen::print_engine_info();
        hexen::print_binary_info();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut engine = hexen::Engine::new(&mut input, &mut output);
    engine.protocol_loop()
}
