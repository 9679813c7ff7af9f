use anyhow::Result;

use spinrate::{Cli, Config, ConsoleReporter, Controller};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse_args();
    let config = Config::load()?.with_cli(&cli)?;
    tracing::debug!(?config, "Loaded configuration");

    let mut controller = Controller::new(ConsoleReporter::stdout(config.format));
    let summary = controller.run(config.samples, config.interval())?;

    tracing::info!(
        samples = summary.samples.len(),
        final_count = summary.final_count,
        "Done"
    );

    Ok(())
}
