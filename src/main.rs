use clap::Parser;
use locator_engine::cli::commands::{AnalyzeSource, cmd_analyze, cmd_inspect};
use locator_engine::cli::config::{Cli, Commands, load_config};
use locator_engine::cli::logging::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    // CLI > config > defaults
    let succeeded = match cli.command {
        Commands::Analyze {
            url,
            file,
            page_url,
            format,
            include_hidden,
            output,
        } => {
            let source = AnalyzeSource::from_args(url.as_deref(), file.as_deref(), page_url.as_deref())
                .ok_or("either --url or --file is required")?;
            let format = format.as_deref().unwrap_or(&config.analyze.format);
            let include_hidden = include_hidden || config.analyze.include_hidden;
            cmd_analyze(&source, format, include_hidden, output.as_deref(), &config.fetch)?
        }
        Commands::Inspect {
            file,
            selectors,
            framework,
            export,
        } => {
            let framework = framework.as_deref().unwrap_or(&config.inspect.framework);
            let export = export.as_deref().or(config.inspect.export.as_deref());
            cmd_inspect(&file, &selectors, framework, export, config.inspect.history_capacity)?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
