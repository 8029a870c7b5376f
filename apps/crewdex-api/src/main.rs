use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = crewdex_api::Args::parse();
	crewdex_api::run(args).await
}
