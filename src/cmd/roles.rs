#[derive(clap::Args)]
pub struct RolesArgs {}

#[tokio::main]
pub async fn run(config: &crate::config::Config, _args: &RolesArgs) -> Result<(), anyhow::Error> {
    let client = crate::client::MetadataClient::new(config)?;
    let token = client.acquire_token().await;
    let roles = crate::resolver::list_role_names(&client, token.as_ref()).await?;
    for role in roles {
        println!("{role}");
    }
    Ok(())
}
