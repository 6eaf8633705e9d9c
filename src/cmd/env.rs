#[derive(clap::Args)]
pub struct EnvArgs {
    #[clap(flatten)]
    selector: super::SessionSelector,
}

#[tokio::main]
pub async fn run(config: &crate::config::Config, args: &EnvArgs) -> Result<(), anyhow::Error> {
    use std::io::Write;

    let client = crate::client::MetadataClient::new(config)?;
    let session = args.selector.resolve(&client).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render(&session).as_bytes())?;
    Ok(())
}

/// Render `export` lines for a POSIX shell
pub fn render(session: &crate::session::ResolvedSession) -> String {
    let mut out = String::new();
    for (name, value) in session.env_vars() {
        out.push_str(&format!("export {name}={}\n", shell_quote(&value)));
    }
    out
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
