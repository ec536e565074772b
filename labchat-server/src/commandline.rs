use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::error::LabChatError;
use crate::server::run_server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[command(about = "Chat server for the chemical lab inventory tracker")]
pub struct Commandline {
	#[arg(short = 'c', long = "config-file", default_value = "configuration.toml")]
	pub configuration_file_path: String,
	#[command(subcommand)]
	pub command: Option<BaseCommand>,
}

#[derive(clap::Subcommand, Default)]
pub enum BaseCommand {
	/// Run the chat server (REST API and websocket gateway)
	#[default]
	Run,
	/// Print the configuration
	Configuration,
}

impl Commandline {
	pub async fn run(self) -> Result<(), LabChatError> {
		let configuration = Configuration::from_file(&self.configuration_file_path)?;

		match self.command.unwrap_or_default() {
			BaseCommand::Run => {
				tracing_subscriber::fmt()
					.with_env_filter(EnvFilter::try_new(&configuration.log_filters)?)
					.init();

				let address = configuration.address;
				let application_context = ApplicationContext::new(configuration).await?;
				info!("Starting server. Start websocket connections at 'ws://{address}/ws'.");
				run_server(application_context).await?;
			}
			BaseCommand::Configuration => println!("{configuration:#?}"),
		}
		Ok(())
	}
}
