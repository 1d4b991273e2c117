use clap::Parser;
use imgedit::cli::Cli;
use imgedit::imaging::{Pipeline, RustBackend};
use imgedit::metadata::read_image_info;
use imgedit::process::Editor;
use imgedit::{config, output};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    let Some(input) = cli.input.as_deref() else {
        return Ok(());
    };

    let config = config::load_config(cli.config.as_deref())?;

    if cli.info_only() {
        match read_image_info(input) {
            Ok(info) => output::print_image_info(&info, cli.json),
            Err(e) => {
                tracing::error!("Error getting image info: {e}");
                output::print_no_info();
            }
        }
        return Ok(());
    }

    let params = cli.edit_params(&config);
    let pipeline = Pipeline::from_params(&params, config.fonts.font_search());
    let backend = RustBackend::new();
    let editor = Editor {
        backend: &backend,
        params: &params,
        pipeline: &pipeline,
        json_info: cli.json,
    };

    if cli.is_batch() {
        if let Err(e) = editor.batch_process(input, cli.output.as_deref(), cli.recursive) {
            tracing::error!("Error: {e}");
        }
    } else {
        editor.process_and_report(input, cli.output.as_deref());
    }

    Ok(())
}

/// Diagnostics go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
