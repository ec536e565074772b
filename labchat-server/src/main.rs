use crate::commandline::Commandline;
use crate::error::LabChatError;
use clap::Parser;

mod chat;
mod commandline;
mod configuration;
mod connection;
mod context;
mod database;
mod error;
mod gateway;
mod lifecycle;
mod message;
mod presence;
mod room;
mod server;

#[tokio::main]
async fn main() -> Result<(), LabChatError> {
	Commandline::parse().run().await
}
