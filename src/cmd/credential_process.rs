#[derive(clap::Args)]
pub struct CredentialProcessArgs {
    #[clap(flatten)]
    selector: super::SessionSelector,
}

#[tokio::main]
pub async fn run(
    config: &crate::config::Config,
    args: &CredentialProcessArgs,
) -> Result<(), anyhow::Error> {
    let client = crate::client::MetadataClient::new(config)?;
    let session = args.selector.resolve(&client).await?;

    tracing::info!(message = "Vending credentials to consumer", ok = true, access_key_id = %session.access_key_id, expiration = ?session.expiration);

    serde_json::to_writer(std::io::stdout(), &session.to_credential_process())?;
    Ok(())
}
