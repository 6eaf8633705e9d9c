//! Resolve a session from the roles attached to this instance.
//!
//! Every call re-queries the metadata service; nothing is cached between calls.

const SECURITY_CREDENTIALS_PATH: &str = "iam/security-credentials/";

/// Role names attached to the instance, in the order the metadata service lists them.
pub async fn list_role_names(
    client: &crate::client::MetadataClient,
    token: Option<&crate::credentials::MetadataToken>,
) -> Result<Vec<String>, crate::error::Error> {
    let raw = client.get_metadata(SECURITY_CREDENTIALS_PATH, token).await?;
    Ok(raw
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_owned())
        .collect())
}

pub async fn fetch_role_credentials(
    client: &crate::client::MetadataClient,
    role_name: &str,
    token: Option<&crate::credentials::MetadataToken>,
) -> Result<crate::credentials::RoleCredentialSet, crate::error::Error> {
    let raw = client
        .get_metadata(&format!("{SECURITY_CREDENTIALS_PATH}{role_name}"), token)
        .await?;
    crate::credentials::RoleCredentialSet::parse(role_name, &raw)
}

/// Find the attached role currently serving `access_key_id` and build a session from it.
///
/// Roles are scanned in listed order and the first one with a matching `AccessKeyId` and
/// `Code: Success` wins. A malformed payload stops the scan.
#[tracing::instrument(skip(client))]
pub async fn resolve_session_by_access_key(
    client: &crate::client::MetadataClient,
    access_key_id: &str,
    region: Option<&str>,
) -> Result<crate::session::ResolvedSession, crate::error::Error> {
    let token = client.acquire_token().await;
    let roles = list_role_names(client, token.as_ref()).await?;
    tracing::debug!(message = "Listed roles", roles = ?roles, imdsv2 = token.is_some());

    for role in roles.iter() {
        let creds = fetch_role_credentials(client, role, token.as_ref()).await?;
        tracing::trace!(role = %role, access_key_id = %creds.access_key_id, status = ?creds.status);

        if creds.access_key_id == access_key_id && creds.is_success() {
            tracing::debug!(message = "Found matching role", role = %role, expiration = ?creds.expiration);
            return Ok(crate::session::ResolvedSession::new(
                creds,
                region.map(|v| v.to_owned()),
            ));
        }
    }

    tracing::debug!(message = "No role matched", roles_scanned = roles.len());
    Err(crate::error::Error::CredentialNotFound(
        access_key_id.to_owned(),
    ))
}

/// Build a session from the credentials of a role known by name.
#[tracing::instrument(skip(client))]
pub async fn resolve_session_by_role_name(
    client: &crate::client::MetadataClient,
    role_name: &str,
    region: Option<&str>,
) -> Result<crate::session::ResolvedSession, crate::error::Error> {
    let token = client.acquire_token().await;
    let creds = fetch_role_credentials(client, role_name, token.as_ref()).await?;

    if !creds.is_success() {
        return Err(crate::error::Error::RoleCredentialsFailed {
            role: role_name.to_owned(),
            message: creds.message,
        });
    }

    Ok(crate::session::ResolvedSession::new(
        creds,
        region.map(|v| v.to_owned()),
    ))
}
