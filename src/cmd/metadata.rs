#[derive(clap::Args)]
pub struct MetadataArgs {
    #[clap(value_parser)]
    /// Path under latest/meta-data/, e.g. `instance-id` or `placement/region`
    path: String,
}

#[tokio::main]
pub async fn run(config: &crate::config::Config, args: &MetadataArgs) -> Result<(), anyhow::Error> {
    let client = crate::client::MetadataClient::new(config)?;
    let token = client.acquire_token().await;
    let value = client.get_metadata(&args.path, token.as_ref()).await?;
    println!("{value}");
    Ok(())
}
