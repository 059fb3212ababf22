use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use myform::api::FormApi;
use myform::binding::{FormBinding, TerminalView};
use myform::config::Config;
use myform::form::{FormDataPatch, FormState, FormStatus, FormStore};
use myform::logging::init_tracing;
use myform::transport::HttpTransport;

#[derive(Parser, Debug)]
#[command(name = "myform", about = "Validate and submit the identity form")]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the submission endpoint
    #[arg(long, value_name = "URL")]
    action: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the fields and print which ones are invalid
    Validate(FieldArgs),
    /// Validate, submit and poll until the server settles
    Submit(FieldArgs),
}

#[derive(Args, Debug)]
struct FieldArgs {
    #[arg(long, default_value = "")]
    fio: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
}

impl FieldArgs {
    fn into_patch(self) -> FormDataPatch {
        FormDataPatch {
            fio: Some(self.fio),
            email: Some(self.email),
            phone: Some(self.phone),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let action = cli.action.unwrap_or_else(|| config.form.action.clone());
    let transport =
        HttpTransport::from_config(&config).context("Failed to build HTTP transport")?;
    let store = FormStore::new(FormState::with_action(action));
    let api = FormApi::new(store, Arc::new(transport));

    let status = match cli.command {
        Command::Validate(fields) => {
            api.set_data(fields.into_patch());
            let report = api.validate();
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.is_valid {
                FormStatus::Success
            } else {
                FormStatus::Error
            }
        }
        Command::Submit(fields) => submit(api, fields).await,
    };

    if status != FormStatus::Success {
        std::process::exit(1);
    }
    Ok(())
}

async fn submit(api: FormApi, fields: FieldArgs) -> FormStatus {
    let binding = FormBinding::attach(api.clone(), Arc::new(TerminalView::stdout()));
    let FieldArgs { fio, email, phone } = fields;
    binding.on_input(&fio, &email, &phone);

    let finished = binding.on_submit().wait();
    tokio::pin!(finished);
    tokio::select! {
        _ = finished.as_mut() => {}
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    tracing::info!("Interrupted, cancelling submission");
                    api.cancel();
                }
                Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
            }
            finished.as_mut().await;
        }
    }

    binding.detach();
    api.state().form_status
}
