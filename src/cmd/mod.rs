pub mod credential_process;
pub mod env;
pub mod metadata;
pub mod roles;

/// Which attached role to build a session from
#[derive(clap::Args, Debug)]
#[clap(group(clap::ArgGroup::new("selector").required(true).args(&["access_key_id", "role_name"])))]
pub struct SessionSelector {
    /// AccessKeyId currently served for one of the attached roles
    #[clap(long)]
    access_key_id: Option<String>,
    /// Name of an attached IAM role
    #[clap(long)]
    role_name: Option<String>,
    /// AWS region to record in the session; defaults to $AWS_REGION or $AWS_DEFAULT_REGION
    #[clap(long)]
    region: Option<String>,
}

impl SessionSelector {
    pub(crate) async fn resolve(
        &self,
        client: &crate::client::MetadataClient,
    ) -> Result<crate::session::ResolvedSession, crate::error::Error> {
        let region = self.region.clone().or_else(crate::config::default_region);
        let region = region.as_deref();
        match (&self.access_key_id, &self.role_name) {
            (Some(access_key_id), _) => {
                crate::resolver::resolve_session_by_access_key(client, access_key_id, region).await
            }
            (None, Some(role_name)) => {
                crate::resolver::resolve_session_by_role_name(client, role_name, region).await
            }
            (None, None) => Err(crate::error::Error::ConfigError(
                "--access-key-id or --role-name is required".to_string(),
            )),
        }
    }
}
